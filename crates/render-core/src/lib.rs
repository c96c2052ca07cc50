//! Core abstractions between the export transform and a document backend.
//!
//! This crate provides:
//! - `DrawCommand` and its payloads, already in output space (points, Y up)
//! - the `DocumentSink` trait a backend implements
//! - the error type for sink operations
//! - coordinate helpers shared by the transform and backends

mod error;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use traits::DocumentSink;
pub use types::{DrawCommand, ImagePlacement, PageCommands, PageGeometry, TextRun};
