use overstamp_model::ModelError;
use overstamp_render_core::RenderError;
use overstamp_store::StoreError;
use thiserror::Error;

/// Why an upload was turned away. The message is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("Please choose a PDF file (got {media_type:?}).")]
    WrongMediaType { media_type: String },

    #[error("File is too large ({size} bytes); the limit is {limit} bytes.")]
    TooLarge { size: u64, limit: u64 },
}

/// The accepted bytes could not be read as a PDF document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("No upload is waiting to be decoded")]
    NothingToDecode,

    #[error("Could not read the PDF: {0}")]
    Malformed(String),

    #[error("The PDF has no pages")]
    NoPages,

    #[error("Decoding was interrupted: {0}")]
    Interrupted(String),
}

/// Whole-export failures. Problems with single annotations are reported in
/// the export report instead.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No document is loaded")]
    NoDocument,

    #[error("An export is already in progress")]
    AlreadyInProgress,

    #[error("Writing the document failed: {0}")]
    Sink(#[from] RenderError),

    #[error("Export task failed: {0}")]
    Interrupted(String),
}

/// A comprehensive error type for the whole library.
#[derive(Error, Debug)]
pub enum OverstampError {
    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),

    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Edit failed: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid annotation: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
