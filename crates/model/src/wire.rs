//! Flat JSON form of [`Annotation`], the shape the browser editor produced.

use crate::annotation::{Annotation, AnnotationKind, ImageAnnotation, Placement, TextAnnotation};
use crate::error::ModelError;
use crate::limits::{
    FONT_SIZE_DEFAULT, LINE_HEIGHT_DEFAULT, clamp_font_size, clamp_image_dimension,
    clamp_line_height,
};
use crate::style::{FontFamily, TextAlign};
use overstamp_types::{AnnotationId, Color, ResourceUri, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotationWire {
    kind: AnnotationKind,
    id: AnnotationId,
    page: u32,
    x: f32,
    y: f32,
    #[serde(default)]
    display_width: f32,
    #[serde(default)]
    display_height: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_family: Option<FontFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    box_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    box_height: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_src: Option<ResourceUri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f32>,
}

impl From<Annotation> for AnnotationWire {
    fn from(annotation: Annotation) -> Self {
        let p = annotation.placement().clone();
        let mut wire = AnnotationWire {
            kind: annotation.kind(),
            id: p.id(),
            page: p.page(),
            x: p.x(),
            y: p.y(),
            display_width: p.display_width(),
            display_height: p.display_height(),
            text: None,
            color: None,
            font_size: None,
            font_family: None,
            line_height: None,
            text_align: None,
            box_width: None,
            box_height: None,
            image_src: None,
            width: None,
            height: None,
        };
        match annotation {
            Annotation::Text(text) => {
                wire.text = Some(text.text);
                wire.color = Some(text.color);
                wire.font_size = Some(text.font_size);
                wire.font_family = Some(text.font_family);
                wire.line_height = Some(text.line_height);
                wire.text_align = Some(text.text_align);
                wire.box_width = text.measured.map(|m| m.width);
                wire.box_height = text.measured.map(|m| m.height);
            }
            Annotation::Image(image) => {
                wire.image_src = Some(image.image_src);
                wire.width = Some(image.width);
                wire.height = Some(image.height);
            }
        }
        wire
    }
}

impl TryFrom<AnnotationWire> for Annotation {
    type Error = ModelError;

    fn try_from(wire: AnnotationWire) -> Result<Self, Self::Error> {
        if wire.page == 0 {
            return Err(ModelError::InvalidWire("page numbers start at 1".into()));
        }
        let placement = Placement::restore(
            wire.id,
            wire.page,
            wire.x,
            wire.y,
            wire.display_width,
            wire.display_height,
        );

        match wire.kind {
            AnnotationKind::Text => {
                if wire.image_src.is_some() || wire.width.is_some() || wire.height.is_some() {
                    return Err(ModelError::InvalidWire(
                        "text annotation carries image fields".into(),
                    ));
                }
                let measured = match (wire.box_width, wire.box_height) {
                    (Some(w), Some(h)) => Some(Size::new(w, h)),
                    _ => None,
                };
                Ok(Annotation::Text(TextAnnotation {
                    placement,
                    text: wire.text.unwrap_or_default(),
                    color: wire.color.unwrap_or_default(),
                    font_size: clamp_font_size(wire.font_size.unwrap_or(FONT_SIZE_DEFAULT)),
                    font_family: wire.font_family.unwrap_or_default(),
                    line_height: clamp_line_height(wire.line_height.unwrap_or(LINE_HEIGHT_DEFAULT)),
                    text_align: wire.text_align.unwrap_or_default(),
                    measured,
                }))
            }
            AnnotationKind::Image => {
                if wire.text.is_some() || wire.font_size.is_some() || wire.font_family.is_some() {
                    return Err(ModelError::InvalidWire(
                        "image annotation carries text fields".into(),
                    ));
                }
                let (Some(image_src), Some(width), Some(height)) =
                    (wire.image_src, wire.width, wire.height)
                else {
                    return Err(ModelError::InvalidWire(
                        "image annotation requires imageSrc, width and height".into(),
                    ));
                };
                Ok(Annotation::Image(ImageAnnotation {
                    placement,
                    image_src,
                    width: clamp_image_dimension(width),
                    height: clamp_image_dimension(height),
                }))
            }
        }
    }
}
