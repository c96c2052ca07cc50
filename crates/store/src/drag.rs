use overstamp_types::AnnotationId;

/// A pointer drag in progress. Moves are honoured only on the page the drag
/// started on; the pointer leaving that page does not carry the annotation
/// to another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub id: AnnotationId,
    pub page: u32,
}
