//! Stamp text and signature annotations onto existing PDF documents.
//!
//! Annotations are placed against a page as it is displayed, in unit
//! coordinates plus the displayed page size. Exporting maps them into each
//! page's own coordinate space and draws them over the original content.
//!
//! ```no_run
//! use overstamp::{SessionBuilder, Upload};
//! use overstamp::model::NewText;
//! use overstamp::types::{NormalizedPoint, Size};
//!
//! # fn main() -> Result<(), overstamp::OverstampError> {
//! let (mut session, exporter) = SessionBuilder::new().build();
//! session.accept_upload(Upload::pdf("contract.pdf", std::fs::read("contract.pdf")?))?;
//! session.finish_loading()?;
//! session.store_mut().add_text(NewText::new(
//!     1,
//!     NormalizedPoint::new(0.1, 0.9),
//!     Size::new(800.0, 1035.0),
//!     "Approved",
//! ))?;
//! let output = exporter.export(&session)?;
//! std::fs::write(&output.file_name, &output.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod exporter;
pub mod session;

pub use builder::SessionBuilder;
pub use config::{ExportConfig, FontConfig, OverstampConfig, UploadPolicy};
pub use error::{DecodeError, ExportError, OverstampError, UploadError};
pub use exporter::{ExportGuard, ExportOutput, Exporter, annotated_file_name};
pub use session::{DocumentInfo, DocumentSession, DocumentState, SourceDocument, Upload, decode};

pub use overstamp_export as export;
pub use overstamp_layout as layout;
pub use overstamp_model as model;
pub use overstamp_render_core as render;
pub use overstamp_store as store;
pub use overstamp_traits as traits;
pub use overstamp_types as types;
