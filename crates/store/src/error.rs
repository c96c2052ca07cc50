use overstamp_model::AnnotationKind;
use overstamp_types::AnnotationId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("No annotation with id {0}")]
    NotFound(AnnotationId),

    #[error("Annotation {id} is {actual}, but the edit targets {requested}")]
    VariantMismatch {
        id: AnnotationId,
        actual: AnnotationKind,
        requested: AnnotationKind,
    },

    #[error("Page {page} is outside the document (1..={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
}
