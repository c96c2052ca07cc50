//! Conversion between viewport pointer coordinates and the resolution
//! independent `[0, 1]` placement space.

use crate::geometry::clamp_unit;
use serde::{Deserialize, Serialize};

/// A pointer position in viewport (client) pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientPoint {
    pub client_x: f32,
    pub client_y: f32,
}

impl ClientPoint {
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }
}

/// The bounding rectangle of a rendered page surface, in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A surface at the viewport origin; useful when only the size matters.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// A position as fractions of a surface's width and height, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPoint {
    /// Builds a point, clamping both coordinates into `[0, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

fn fraction(offset: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !extent.is_finite() {
        return 0.0;
    }
    clamp_unit(offset / extent)
}

/// Maps a pointer position onto `surface`. Positions outside the surface are
/// clamped to its edges; a zero or negative sized surface maps to `0`.
pub fn normalize(pointer: ClientPoint, surface: SurfaceRect) -> NormalizedPoint {
    NormalizedPoint {
        x: fraction(pointer.client_x - surface.left, surface.width),
        y: fraction(pointer.client_y - surface.top, surface.height),
    }
}

/// Inverse of [`normalize`] for points inside the surface.
pub fn denormalize(point: NormalizedPoint, surface: SurfaceRect) -> ClientPoint {
    ClientPoint {
        client_x: surface.left + point.x * surface.width,
        client_y: surface.top + point.y * surface.height,
    }
}
