//! The loaded document and its annotations.
//!
//! A session moves through `Empty → Loading → Ready | Failed`. Accepting an
//! upload always discards the previous document and every annotation.

use crate::config::UploadPolicy;
use crate::error::{DecodeError, UploadError};
use overstamp_render_core::{DocumentSink, PageGeometry};
use overstamp_render_lopdf::LopdfSink;
use overstamp_store::PlacementStore;
use overstamp_types::{AnnotationId, ClientPoint, SurfaceRect};
use std::sync::Arc;

/// A file handed over by the user.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: crate::config::PDF_MEDIA_TYPE.to_string(),
            bytes,
        }
    }
}

/// The accepted upload, kept verbatim for export.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Arc<Vec<u8>>,
}

/// Page count and page sizes of a decoded document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub page_count: u32,
    /// Indexed by page number minus one.
    pub page_sizes: Vec<PageGeometry>,
}

impl DocumentInfo {
    pub fn page_size(&self, page: u32) -> Option<PageGeometry> {
        let index = page.checked_sub(1)?;
        self.page_sizes.get(index as usize).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DocumentState {
    #[default]
    Empty,
    Loading,
    Ready(DocumentInfo),
    Failed(DecodeError),
}

/// Reads page count and page sizes without modifying anything.
pub fn decode(bytes: &[u8]) -> Result<DocumentInfo, DecodeError> {
    let sink = LopdfSink::load(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let page_count = sink.page_count();
    if page_count == 0 {
        return Err(DecodeError::NoPages);
    }
    let page_sizes = (1..=page_count)
        .map(|page| sink.page_size(page))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
    Ok(DocumentInfo {
        page_count,
        page_sizes,
    })
}

#[derive(Debug, Default)]
pub struct DocumentSession {
    policy: UploadPolicy,
    store: PlacementStore,
    source: Option<SourceDocument>,
    state: DocumentState,
    upload_message: Option<String>,
}

impl DocumentSession {
    pub fn new(policy: UploadPolicy, store: PlacementStore) -> Self {
        Self {
            policy,
            store,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PlacementStore {
        &mut self.store
    }

    pub fn source(&self) -> Option<&SourceDocument> {
        self.source.as_ref()
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DocumentState::Loading)
    }

    pub fn info(&self) -> Option<&DocumentInfo> {
        match &self.state {
            DocumentState::Ready(info) => Some(info),
            _ => None,
        }
    }

    /// Message of the last rejected upload, cleared by the next accepted one.
    pub fn upload_message(&self) -> Option<&str> {
        self.upload_message.as_deref()
    }

    /// Validates `upload` and, when it passes, replaces the current document.
    /// A rejected upload only sets the upload message.
    pub fn accept_upload(&mut self, upload: Upload) -> Result<(), UploadError> {
        if let Err(err) = self.policy.check(&upload.media_type, upload.bytes.len() as u64) {
            log::warn!("Rejected upload '{}': {}", upload.name, err);
            self.upload_message = Some(err.to_string());
            return Err(err);
        }

        log::info!("Accepted '{}' ({} bytes)", upload.name, upload.bytes.len());
        self.store.clear_all();
        self.store.set_page_count(None);
        self.source = Some(SourceDocument {
            name: upload.name,
            bytes: Arc::new(upload.bytes),
        });
        self.state = DocumentState::Loading;
        self.upload_message = None;
        Ok(())
    }

    /// Decodes the accepted upload on the calling thread.
    pub fn finish_loading(&mut self) -> Result<&DocumentInfo, DecodeError> {
        let bytes = self.pending_bytes()?;
        let result = decode(&bytes);
        self.apply_decode(result)
    }

    /// Decodes the accepted upload on tokio's blocking pool.
    pub async fn load_async(&mut self) -> Result<&DocumentInfo, DecodeError> {
        let bytes = self.pending_bytes()?;
        let result = tokio::task::spawn_blocking(move || decode(&bytes))
            .await
            .unwrap_or_else(|e| Err(DecodeError::Interrupted(e.to_string())));
        self.apply_decode(result)
    }

    fn pending_bytes(&self) -> Result<Arc<Vec<u8>>, DecodeError> {
        match (&self.state, &self.source) {
            (DocumentState::Loading, Some(source)) => Ok(Arc::clone(&source.bytes)),
            _ => Err(DecodeError::NothingToDecode),
        }
    }

    fn apply_decode(
        &mut self,
        result: Result<DocumentInfo, DecodeError>,
    ) -> Result<&DocumentInfo, DecodeError> {
        match result {
            Ok(info) => {
                log::info!("Decoded document with {} pages", info.page_count);
                self.store.set_page_count(Some(info.page_count));
                self.state = DocumentState::Ready(info);
            }
            Err(err) => {
                log::warn!("Could not decode document: {}", err);
                self.state = DocumentState::Failed(err);
            }
        }
        match &self.state {
            DocumentState::Ready(info) => Ok(info),
            DocumentState::Failed(err) => Err(err.clone()),
            _ => Err(DecodeError::NothingToDecode),
        }
    }

    /// A click on `page`. While the document is not ready no page has a
    /// rendered surface, so the click is ignored.
    pub fn click(
        &mut self,
        page: u32,
        pointer: ClientPoint,
        surface: SurfaceRect,
        text: Option<String>,
    ) -> Result<Option<AnnotationId>, overstamp_store::StoreError> {
        let surface = self.info().map(|_| surface);
        self.store.place_at(page, pointer, surface, text)
    }
}
