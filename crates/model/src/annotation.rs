use crate::error::ModelError;
use crate::limits::{
    FONT_SIZE_DEFAULT, LINE_HEIGHT_DEFAULT, MEASUREMENT_TOLERANCE, clamp_font_size,
    clamp_image_dimension, clamp_line_height, clone_position,
};
use crate::patch::{AnnotationPatch, ImagePatch, TextPatch};
use crate::style::{FontFamily, TextAlign};
use crate::wire::AnnotationWire;
use overstamp_types::{AnnotationId, Color, NormalizedPoint, ResourceUri, Size, clamp_unit};
use serde::{Deserialize, Serialize};

/// Where an annotation sits, and the frame it was placed in.
///
/// `display_width`/`display_height` record the rendered page size at the
/// moment of placement. They have no setter: export math depends on the
/// original frame even after the viewport is resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    id: AnnotationId,
    page: u32,
    x: f32,
    y: f32,
    display_width: f32,
    display_height: f32,
}

impl Placement {
    /// A placement with a fresh id.
    pub fn new(page: u32, position: NormalizedPoint, display: Size) -> Self {
        Self::restore(
            AnnotationId::new(),
            page,
            position.x,
            position.y,
            display.width,
            display.height,
        )
    }

    /// Rebuilds a placement with a known id, clamping the coordinates.
    pub(crate) fn restore(
        id: AnnotationId,
        page: u32,
        x: f32,
        y: f32,
        display_width: f32,
        display_height: f32,
    ) -> Self {
        Self {
            id,
            page,
            x: clamp_unit(x),
            y: clamp_unit(y),
            display_width,
            display_height,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn position(&self) -> NormalizedPoint {
        NormalizedPoint { x: self.x, y: self.y }
    }

    pub fn display_width(&self) -> f32 {
        self.display_width
    }

    pub fn display_height(&self) -> f32 {
        self.display_height
    }

    pub fn display_size(&self) -> Size {
        Size::new(self.display_width, self.display_height)
    }

    pub fn move_to(&mut self, position: NormalizedPoint) {
        self.x = clamp_unit(position.x);
        self.y = clamp_unit(position.y);
    }

    fn offset_copy(&self) -> Self {
        Self {
            id: AnnotationId::new(),
            x: clone_position(self.x),
            y: clone_position(self.y),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Text,
    Image,
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationKind::Text => f.write_str("text"),
            AnnotationKind::Image => f.write_str("image"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub(crate) placement: Placement,
    pub(crate) text: String,
    pub(crate) color: Color,
    pub(crate) font_size: f32,
    pub(crate) font_family: FontFamily,
    pub(crate) line_height: f32,
    pub(crate) text_align: TextAlign,
    pub(crate) measured: Option<Size>,
}

impl TextAnnotation {
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Font size in display pixels, within `[8, 72]`.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font_family(&self) -> &FontFamily {
        &self.font_family
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    /// The rendered box reported by the viewer, if any.
    pub fn measured(&self) -> Option<Size> {
        self.measured
    }

    /// Stores a box measured by the viewer. Returns `false` when the change is
    /// within half a pixel of the stored box, which is left untouched.
    pub fn record_measurement(&mut self, size: Size) -> bool {
        if let Some(current) = self.measured
            && (current.width - size.width).abs() <= MEASUREMENT_TOLERANCE
            && (current.height - size.height).abs() <= MEASUREMENT_TOLERANCE
        {
            return false;
        }
        self.measured = Some(size);
        true
    }

    fn apply(&mut self, patch: &TextPatch) {
        if let Some(text) = &patch.text {
            if *text != self.text {
                // Stale for the new content.
                self.measured = None;
            }
            self.text = text.clone();
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(size) = patch.font_size {
            let size = clamp_font_size(size);
            if size != self.font_size {
                self.measured = None;
            }
            self.font_size = size;
        }
        if let Some(family) = &patch.font_family {
            if *family != self.font_family {
                self.measured = None;
            }
            self.font_family = family.clone();
        }
        if let Some(line_height) = patch.line_height {
            let line_height = clamp_line_height(line_height);
            if line_height != self.line_height {
                self.measured = None;
            }
            self.line_height = line_height;
        }
        if let Some(align) = patch.text_align {
            self.text_align = align;
        }
        if let Some(position) = patch.position {
            self.placement.move_to(position);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnnotation {
    pub(crate) placement: Placement,
    pub(crate) image_src: ResourceUri,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl ImageAnnotation {
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn image_src(&self) -> &ResourceUri {
        &self.image_src
    }

    /// Rendered width in display pixels, within `[20, 1000]`.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    fn apply(&mut self, patch: &ImagePatch) {
        if let Some(src) = &patch.image_src {
            self.image_src = src.clone();
        }
        if let Some(width) = patch.width {
            self.width = clamp_image_dimension(width);
        }
        if let Some(height) = patch.height {
            self.height = clamp_image_dimension(height);
        }
        if let Some(position) = patch.position {
            self.placement.move_to(position);
        }
    }
}

/// A placed item. Consumers match on it exhaustively.
///
/// Serialized flat with a `kind` tag and camelCase field names, e.g.
/// `{"kind":"text","id":"…","page":1,"x":0.1,"y":0.2,"displayWidth":800,…}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AnnotationWire", try_from = "AnnotationWire")]
pub enum Annotation {
    Text(TextAnnotation),
    Image(ImageAnnotation),
}

impl Annotation {
    pub fn id(&self) -> AnnotationId {
        self.placement().id()
    }

    pub fn page(&self) -> u32 {
        self.placement().page()
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Text(_) => AnnotationKind::Text,
            Annotation::Image(_) => AnnotationKind::Image,
        }
    }

    pub fn placement(&self) -> &Placement {
        match self {
            Annotation::Text(text) => &text.placement,
            Annotation::Image(image) => &image.placement,
        }
    }

    pub fn move_to(&mut self, position: NormalizedPoint) {
        match self {
            Annotation::Text(text) => text.placement.move_to(position),
            Annotation::Image(image) => image.placement.move_to(position),
        }
    }

    pub fn as_text(&self) -> Option<&TextAnnotation> {
        match self {
            Annotation::Text(text) => Some(text),
            Annotation::Image(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextAnnotation> {
        match self {
            Annotation::Text(text) => Some(text),
            Annotation::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageAnnotation> {
        match self {
            Annotation::Image(image) => Some(image),
            Annotation::Text(_) => None,
        }
    }

    /// Applies a partial edit in place. The id, page and placement frame are
    /// never touched.
    pub fn apply(&mut self, patch: &AnnotationPatch) -> Result<(), ModelError> {
        match (self, patch) {
            (Annotation::Text(text), AnnotationPatch::Text(p)) => text.apply(p),
            (Annotation::Image(image), AnnotationPatch::Image(p)) => image.apply(p),
            (this, AnnotationPatch::Position(position)) => this.move_to(*position),
            (this, patch) => {
                return Err(ModelError::VariantMismatch {
                    expected: this.kind(),
                    found: patch.kind().unwrap_or(this.kind()),
                });
            }
        }
        Ok(())
    }

    /// A copy with a fresh id, shifted down and right by
    /// [`CLONE_OFFSET`](crate::limits::CLONE_OFFSET).
    pub fn duplicate(&self) -> Annotation {
        match self {
            Annotation::Text(text) => Annotation::Text(TextAnnotation {
                placement: text.placement.offset_copy(),
                ..text.clone()
            }),
            Annotation::Image(image) => Annotation::Image(ImageAnnotation {
                placement: image.placement.offset_copy(),
                ..image.clone()
            }),
        }
    }
}

/// Values used for text fields a caller leaves unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextDefaults {
    pub color: Color,
    pub font_size: f32,
    pub font_family: FontFamily,
    pub line_height: f32,
    pub text_align: TextAlign,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            color: Color::INK,
            font_size: FONT_SIZE_DEFAULT,
            font_family: FontFamily::default(),
            line_height: LINE_HEIGHT_DEFAULT,
            text_align: TextAlign::Left,
        }
    }
}

/// Fields for a new text annotation; unset style fields take defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NewText {
    pub page: u32,
    pub position: NormalizedPoint,
    pub display: Size,
    pub text: String,
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub font_family: Option<FontFamily>,
    pub line_height: Option<f32>,
    pub text_align: Option<TextAlign>,
}

impl NewText {
    pub fn new(page: u32, position: NormalizedPoint, display: Size, text: impl Into<String>) -> Self {
        Self {
            page,
            position,
            display,
            text: text.into(),
            color: None,
            font_size: None,
            font_family: None,
            line_height: None,
            text_align: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_family(mut self, family: impl Into<FontFamily>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_line_height(mut self, multiplier: f32) -> Self {
        self.line_height = Some(multiplier);
        self
    }

    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    pub fn into_annotation(self, defaults: &TextDefaults) -> TextAnnotation {
        TextAnnotation {
            placement: Placement::new(self.page, self.position, self.display),
            text: self.text,
            color: self.color.unwrap_or(defaults.color),
            font_size: clamp_font_size(self.font_size.unwrap_or(defaults.font_size)),
            font_family: self
                .font_family
                .unwrap_or_else(|| defaults.font_family.clone()),
            line_height: clamp_line_height(self.line_height.unwrap_or(defaults.line_height)),
            text_align: self.text_align.unwrap_or(defaults.text_align),
            measured: None,
        }
    }
}

/// Fields for a new image annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub page: u32,
    pub position: NormalizedPoint,
    pub display: Size,
    pub image_src: ResourceUri,
    pub width: f32,
    pub height: f32,
}

impl NewImage {
    pub fn new(
        page: u32,
        position: NormalizedPoint,
        display: Size,
        image_src: impl Into<ResourceUri>,
        size: Size,
    ) -> Self {
        Self {
            page,
            position,
            display,
            image_src: image_src.into(),
            width: size.width,
            height: size.height,
        }
    }

    pub fn into_annotation(self) -> ImageAnnotation {
        ImageAnnotation {
            placement: Placement::new(self.page, self.position, self.display),
            image_src: self.image_src,
            width: clamp_image_dimension(self.width),
            height: clamp_image_dimension(self.height),
        }
    }
}
