//! Baking annotations into a copy of the source document.

use crate::error::ExportError;
use crate::session::DocumentSession;
use overstamp_export::{ExportPlanner, ExportReport, TransformSettings};
use overstamp_layout::FontLibrary;
use overstamp_model::Annotation;
use overstamp_render_core::DocumentSink;
use overstamp_render_lopdf::LopdfSink;
use overstamp_traits::ResourceProvider;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Name used when the upload's name has no stem.
const FALLBACK_STEM: &str = "document";

/// The annotated document ready to be handed to the user.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub report: ExportReport,
}

/// `report.pdf` becomes `report-annotated.pdf`.
pub fn annotated_file_name(original: &str) -> String {
    let trimmed = original.trim();
    let stem = match trimmed.len().checked_sub(4) {
        Some(split)
            if trimmed.is_char_boundary(split)
                && trimmed[split..].eq_ignore_ascii_case(".pdf") =>
        {
            &trimmed[..split]
        }
        _ => trimmed,
    };
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{}-annotated.pdf", stem)
}

/// Resets the in-flight flag when dropped, whether the export succeeded,
/// failed or panicked.
#[derive(Debug)]
pub struct ExportGuard {
    flag: Arc<AtomicBool>,
}

impl ExportGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::AlreadyInProgress)?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Everything an export reads from a session, detached from it.
#[derive(Debug, Clone)]
struct ExportJob {
    name: String,
    bytes: Arc<Vec<u8>>,
    annotations: Vec<Annotation>,
}

impl ExportJob {
    fn from_session(session: &DocumentSession) -> Result<Self, ExportError> {
        let source = match (session.info(), session.source()) {
            (Some(_), Some(source)) => source,
            _ => return Err(ExportError::NoDocument),
        };
        Ok(Self {
            name: source.name.clone(),
            bytes: Arc::clone(&source.bytes),
            annotations: session.store().annotations().to_vec(),
        })
    }
}

/// Runs exports, at most one at a time per exporter (and its clones).
#[derive(Debug, Clone)]
pub struct Exporter {
    fonts: FontLibrary,
    resources: Arc<dyn ResourceProvider>,
    settings: TransformSettings,
    in_flight: Arc<AtomicBool>,
}

impl Exporter {
    pub fn new(fonts: FontLibrary, resources: Arc<dyn ResourceProvider>) -> Self {
        Self {
            fonts,
            resources,
            settings: TransformSettings::default(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_settings(mut self, settings: TransformSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Marks an export as in flight until the guard is dropped.
    pub fn begin(&self) -> Result<ExportGuard, ExportError> {
        ExportGuard::acquire(&self.in_flight)
    }

    /// Exports on the calling thread.
    pub fn export(&self, session: &DocumentSession) -> Result<ExportOutput, ExportError> {
        let _guard = self.begin()?;
        let job = ExportJob::from_session(session)?;
        self.run(&job)
    }

    /// Exports on tokio's blocking pool. A second call while one is running
    /// fails immediately with `AlreadyInProgress`.
    pub async fn export_async(
        &self,
        session: &DocumentSession,
    ) -> Result<ExportOutput, ExportError> {
        let guard = self.begin()?;
        let job = ExportJob::from_session(session)?;
        let exporter = self.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            exporter.run(&job)
        })
        .await
        .map_err(|e| ExportError::Interrupted(e.to_string()))?
    }

    fn run(&self, job: &ExportJob) -> Result<ExportOutput, ExportError> {
        log::info!(
            "Exporting '{}' with {} annotations",
            job.name,
            job.annotations.len()
        );
        let mut sink = LopdfSink::load(&job.bytes)?;
        let plan = ExportPlanner::new(&self.fonts, self.resources.as_ref())
            .with_settings(self.settings)
            .plan(&job.annotations, &sink)?;
        plan.apply(&mut sink)?;
        let bytes = Box::new(sink).finish()?;

        let file_name = annotated_file_name(&job.name);
        log::info!("Exported {} ({}): {}", file_name, bytes.len(), plan.report);
        Ok(ExportOutput {
            bytes,
            file_name,
            report: plan.report,
        })
    }
}
