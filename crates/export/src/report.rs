use overstamp_layout::{FontKey, StandardFont};
use overstamp_model::AnnotationKind;
use overstamp_types::{AnnotationId, Rect};
use std::fmt;

/// Why an annotation was left out of the output.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    PageOutOfRange { page: u32, page_count: u32 },
    EmptyText,
    ImageUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PageOutOfRange { page, page_count } => {
                write!(f, "page {} is beyond the document's {} pages", page, page_count)
            }
            SkipReason::EmptyText => f.write_str("text is empty"),
            SkipReason::ImageUnavailable(message) => write!(f, "image unavailable: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnAnnotation {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    pub page: u32,
    /// Bounding box in document space, Y up.
    pub extent: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedAnnotation {
    pub id: AnnotationId,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSubstitution {
    pub id: AnnotationId,
    pub requested: FontKey,
    pub used: StandardFont,
}

/// What an export did with each annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub drawn: Vec<DrawnAnnotation>,
    pub skipped: Vec<SkippedAnnotation>,
    pub substitutions: Vec<FontSubstitution>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.substitutions.is_empty()
    }

    pub fn was_drawn(&self, id: AnnotationId) -> bool {
        self.drawn.iter().any(|d| d.id == id)
    }

    pub fn skip_reason(&self, id: AnnotationId) -> Option<&SkipReason> {
        self.skipped.iter().find(|s| s.id == id).map(|s| &s.reason)
    }

    pub fn extent_of(&self, id: AnnotationId) -> Option<Rect> {
        self.drawn.iter().find(|d| d.id == id).map(|d| d.extent)
    }

    pub(crate) fn skip(&mut self, id: AnnotationId, reason: SkipReason) {
        log::warn!("Skipping annotation {}: {}", id, reason);
        self.skipped.push(SkippedAnnotation { id, reason });
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} drawn, {} skipped, {} font substitutions",
            self.drawn.len(),
            self.skipped.len(),
            self.substitutions.len()
        )
    }
}
