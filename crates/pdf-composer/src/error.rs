use lopdf::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Page {0:?} has no MediaBox on itself or any ancestor")]
    MissingMediaBox(ObjectId),

    #[error("Image data is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    ImageDataLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("{0}")]
    Other(String),
}
