use image::RgbaImage;
use overstamp_layout::LoadedFont;
use overstamp_types::{Color, ResourceUri};
use std::fmt;
use std::sync::Arc;

/// Absolute size of an output page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub const LETTER: PageGeometry = PageGeometry { width: 612.0, height: 792.0 };
    pub const A4: PageGeometry = PageGeometry { width: 595.0, height: 842.0 };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One line of text. `x`/`y` locate the left end of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub font: LoadedFont,
    pub color: Color,
}

/// A decoded bitmap stretched over a rectangle whose bottom-left corner is
/// `(x, y)`. Placements sharing a `source` share one image object.
#[derive(Clone, PartialEq)]
pub struct ImagePlacement {
    pub source: ResourceUri,
    pub pixels: Arc<RgbaImage>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl fmt::Debug for ImagePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePlacement")
            .field("source", &self.source)
            .field("pixels", &self.pixels.dimensions())
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text(TextRun),
    Image(ImagePlacement),
}

/// Draw commands for a single 1-based page, in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCommands {
    pub page: u32,
    pub commands: Vec<DrawCommand>,
}

impl PageCommands {
    pub fn new(page: u32) -> Self {
        Self { page, commands: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
