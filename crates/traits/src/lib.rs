pub mod font;
pub mod resource;

pub use font::{FontError, FontProvider, InMemoryFontProvider, SharedFontData};
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
