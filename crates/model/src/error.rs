use crate::annotation::AnnotationKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("A {found} edit cannot be applied to a {expected} annotation")]
    VariantMismatch {
        expected: AnnotationKind,
        found: AnnotationKind,
    },

    #[error("Invalid annotation data: {0}")]
    InvalidWire(String),
}
