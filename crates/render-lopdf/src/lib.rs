//! Document sink backed by lopdf.
//!
//! Loads an existing PDF, stamps draw commands onto its pages as overlay
//! content streams and serializes the result.

mod content;
mod sink;

pub use sink::LopdfSink;
