#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use overstamp::traits::{InMemoryResourceProvider, ResourceProvider};
use overstamp::{DocumentSession, ExportOutput, Exporter, SessionBuilder, Upload};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Tolerance for coordinates read back from a written content stream.
pub const EPSILON: f32 = 0.05;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "expected {} but got {}",
        expected,
        actual
    );
}

/// Wrapper around an exported PDF with helper methods
pub struct AnnotatedPdf {
    pub output: ExportOutput,
    pub doc: LopdfDocument,
}

impl AnnotatedPdf {
    pub fn from_output(output: ExportOutput) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&output.bytes)?;
        Ok(Self { output, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.output.bytes)
    }
}

/// A session with `pdf` uploaded and decoded, plus an exporter that reads
/// images from `resources`. System fonts stay off so font resolution is the
/// same on every machine.
pub fn ready_session_with(
    pdf: Vec<u8>,
    resources: Arc<dyn ResourceProvider>,
) -> Result<(DocumentSession, Exporter), Box<dyn std::error::Error>> {
    let (mut session, exporter) = SessionBuilder::new()
        .with_system_fonts(false)
        .with_resource_provider(resources)
        .build();
    session.accept_upload(Upload::pdf("contract.pdf", pdf))?;
    session.finish_loading()?;
    Ok((session, exporter))
}

pub fn ready_session(
    pdf: Vec<u8>,
) -> Result<(DocumentSession, Exporter), Box<dyn std::error::Error>> {
    ready_session_with(pdf, Arc::new(InMemoryResourceProvider::new()))
}

pub fn export(
    session: &DocumentSession,
    exporter: &Exporter,
) -> Result<AnnotatedPdf, Box<dyn std::error::Error>> {
    AnnotatedPdf::from_output(exporter.export(session)?)
}
