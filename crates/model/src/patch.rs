use crate::annotation::AnnotationKind;
use crate::style::{FontFamily, TextAlign};
use overstamp_types::{Color, NormalizedPoint, ResourceUri};

/// A partial edit of a text annotation. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub text: Option<String>,
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub font_family: Option<FontFamily>,
    pub line_height: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub position: Option<NormalizedPoint>,
}

impl TextPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A partial edit of an image annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    pub image_src: Option<ResourceUri>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub position: Option<NormalizedPoint>,
}

/// A variant-specific edit, or a move that applies to either variant.
///
/// No patch can change the id, page or display frame.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationPatch {
    Text(TextPatch),
    Image(ImagePatch),
    Position(NormalizedPoint),
}

impl AnnotationPatch {
    /// The variant this patch targets, `None` for a plain move.
    pub fn kind(&self) -> Option<AnnotationKind> {
        match self {
            AnnotationPatch::Text(_) => Some(AnnotationKind::Text),
            AnnotationPatch::Image(_) => Some(AnnotationKind::Image),
            AnnotationPatch::Position(_) => None,
        }
    }
}

impl From<TextPatch> for AnnotationPatch {
    fn from(patch: TextPatch) -> Self {
        AnnotationPatch::Text(patch)
    }
}

impl From<ImagePatch> for AnnotationPatch {
    fn from(patch: ImagePatch) -> Self {
        AnnotationPatch::Image(patch)
    }
}
