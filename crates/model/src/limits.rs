//! Numeric bounds shared by the editor surface and the exporter.

use overstamp_types::clamp_within;

pub const FONT_SIZE_MIN: f32 = 8.0;
pub const FONT_SIZE_MAX: f32 = 72.0;
pub const FONT_SIZE_DEFAULT: f32 = 14.0;

pub const LINE_HEIGHT_MIN: f32 = 0.8;
pub const LINE_HEIGHT_DEFAULT: f32 = 1.2;

pub const IMAGE_DIMENSION_MIN: f32 = 20.0;
pub const IMAGE_DIMENSION_MAX: f32 = 1000.0;

/// Offset applied to both coordinates of a clone.
pub const CLONE_OFFSET: f32 = 0.02;
/// Clones never land beyond this fraction of the page.
pub const CLONE_POSITION_MAX: f32 = 0.98;

/// Measured boxes closer than this (px) to the stored one are not rewritten.
pub const MEASUREMENT_TOLERANCE: f32 = 0.5;

pub fn clamp_font_size(size: f32) -> f32 {
    clamp_within(size, FONT_SIZE_MIN, FONT_SIZE_MAX)
}

pub fn clamp_line_height(multiplier: f32) -> f32 {
    if !multiplier.is_finite() {
        return LINE_HEIGHT_DEFAULT;
    }
    multiplier.max(LINE_HEIGHT_MIN)
}

pub fn clamp_image_dimension(px: f32) -> f32 {
    clamp_within(px, IMAGE_DIMENSION_MIN, IMAGE_DIMENSION_MAX)
}

/// `min(value + CLONE_OFFSET, CLONE_POSITION_MAX)`.
pub fn clone_position(value: f32) -> f32 {
    (value + CLONE_OFFSET).min(CLONE_POSITION_MAX)
}
