use overstamp_types::{NormalizedPoint, SurfaceRect, clamp_unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Arrow keys move by one pixel, or ten with Shift held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NudgeStep {
    #[default]
    Fine,
    Coarse,
}

impl NudgeStep {
    pub fn pixels(self) -> f32 {
        match self {
            NudgeStep::Fine => 1.0,
            NudgeStep::Coarse => 10.0,
        }
    }
}

/// Which image dimension the user typed; the other follows when the aspect
/// ratio is locked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeRequest {
    Width(f32),
    Height(f32),
}

/// Moves `from` by a pixel step measured on `surface`. A degenerate surface
/// leaves the point where it is.
pub(crate) fn nudged(
    from: NormalizedPoint,
    direction: NudgeDirection,
    step: NudgeStep,
    surface: SurfaceRect,
) -> NormalizedPoint {
    if surface.width <= 0.0 || surface.height <= 0.0 {
        return from;
    }
    let dx = step.pixels() / surface.width;
    let dy = step.pixels() / surface.height;
    let (x, y) = match direction {
        NudgeDirection::Left => (from.x - dx, from.y),
        NudgeDirection::Right => (from.x + dx, from.y),
        NudgeDirection::Up => (from.x, from.y - dy),
        NudgeDirection::Down => (from.x, from.y + dy),
    };
    NormalizedPoint {
        x: clamp_unit(x),
        y: clamp_unit(y),
    }
}
