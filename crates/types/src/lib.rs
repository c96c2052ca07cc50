pub mod color;
pub mod geometry;
pub mod ids;
pub mod normalize;

pub use color::Color;
pub use geometry::{Point, Rect, Size, clamp_unit, clamp_within};
pub use ids::{AnnotationId, ResourceUri};
pub use normalize::{ClientPoint, NormalizedPoint, SurfaceRect, denormalize, normalize};
