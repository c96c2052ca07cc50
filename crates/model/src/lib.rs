//! The canonical annotation model.
//!
//! An [`Annotation`] is either text or an image, never a record with
//! optional fields for both. Every mutation goes through a constructor or an
//! [`AnnotationPatch`], which keeps the numeric invariants (unit coordinates,
//! font size range, image size range) in one place.

mod annotation;
mod error;
pub mod limits;
mod patch;
mod style;
mod wire;

pub use annotation::{
    Annotation, AnnotationKind, ImageAnnotation, NewImage, NewText, Placement, TextAnnotation,
    TextDefaults,
};
pub use error::ModelError;
pub use patch::{AnnotationPatch, ImagePatch, TextPatch};
pub use style::{FontFamily, FontPreset, TextAlign};
