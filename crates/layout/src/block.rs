//! Multi-line text block layout.
//!
//! A block is the author's lines stacked top to bottom with no automatic
//! wrapping. Its container is as wide as the widest line, and every line is
//! aligned inside that container. Everything here is in a Y-down frame whose
//! origin is the top-left corner of the block; the exporter flips it.

use crate::metrics::FontMetrics;
use overstamp_model::TextAlign;

/// Fraction of the font size between the top of a line box and its baseline.
///
/// Empirically tuned to line up with browser text rendering rather than
/// derived from font ascent, so it is a parameter of the layout.
pub const BASELINE_RATIO: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlockParams {
    pub font_size: f32,
    pub line_height: f32,
    pub align: TextAlign,
    /// Externally measured block height; overrides the estimate when positive.
    pub measured_height: Option<f32>,
    pub baseline_ratio: f32,
}

impl TextBlockParams {
    pub fn new(font_size: f32, line_height: f32, align: TextAlign) -> Self {
        Self {
            font_size,
            line_height,
            align,
            measured_height: None,
            baseline_ratio: BASELINE_RATIO,
        }
    }

    pub fn with_measured_height(mut self, height: Option<f32>) -> Self {
        self.measured_height = height;
        self
    }

    pub fn with_baseline_ratio(mut self, ratio: f32) -> Self {
        self.baseline_ratio = ratio;
        self
    }

    /// Vertical distance between consecutive baselines.
    pub fn line_advance(&self) -> f32 {
        self.font_size * self.line_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub text: String,
    pub width: f32,
    /// Left edge relative to the container's left edge.
    pub offset_x: f32,
    /// Baseline relative to the block top, growing downwards.
    pub baseline_offset: f32,
    /// Whitespace-only lines take up vertical space but draw nothing.
    pub is_blank: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<LineLayout>,
    pub container_width: f32,
    /// `lines * font_size * line_height`.
    pub estimated_height: f32,
    /// The measured height when one was supplied, else the estimate.
    pub height: f32,
}

impl TextBlock {
    pub fn drawable_lines(&self) -> impl Iterator<Item = (usize, &LineLayout)> {
        self.lines.iter().enumerate().filter(|(_, l)| !l.is_blank)
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.is_blank)
    }
}

/// Horizontal offset of a line of width `line_width` inside `container_width`.
pub fn align_offset(align: TextAlign, container_width: f32, line_width: f32) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => (container_width - line_width) / 2.0,
        TextAlign::Right => container_width - line_width,
    }
}

/// Splits `text` on `\n` (a trailing `\r` on each line is dropped).
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Lays out `text` as a block at `params.font_size` using `metrics`.
pub fn layout_text_block(
    text: &str,
    params: &TextBlockParams,
    metrics: &dyn FontMetrics,
) -> TextBlock {
    let size = params.font_size;
    let advance = params.line_advance();

    let measured: Vec<(&str, f32)> = split_lines(text)
        .map(|line| (line, metrics.text_width(line, size)))
        .collect();
    let container_width = measured.iter().map(|(_, w)| *w).fold(0.0_f32, f32::max);

    let lines: Vec<LineLayout> = measured
        .into_iter()
        .enumerate()
        .map(|(i, (line, width))| LineLayout {
            text: line.to_string(),
            width,
            offset_x: align_offset(params.align, container_width, width),
            baseline_offset: size * params.baseline_ratio + i as f32 * advance,
            is_blank: line.trim().is_empty(),
        })
        .collect();

    let estimated_height = lines.len() as f32 * advance;
    let height = match params.measured_height {
        Some(h) if h > 0.0 && h.is_finite() => h,
        _ => estimated_height,
    };

    TextBlock {
        lines,
        container_width,
        estimated_height,
        height,
    }
}
