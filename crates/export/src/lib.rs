//! The export transform.
//!
//! Given the annotations of a session and a [`DocumentSink`] that knows the
//! real page sizes, [`ExportPlanner`] produces the draw commands for every
//! page together with an [`ExportReport`]. The geometry itself lives in
//! [`transform`] and is usable on its own.
//!
//! [`DocumentSink`]: overstamp_render_core::DocumentSink

mod plan;
mod report;
pub mod transform;

pub use plan::{ExportPlan, ExportPlanner};
pub use report::{DrawnAnnotation, ExportReport, FontSubstitution, SkipReason, SkippedAnnotation};
pub use transform::{Scale, TextTransform, TransformSettings, transform_image, transform_text};
