use crate::error::RenderError;
use crate::types::{DrawCommand, PageGeometry};

/// A backend that owns a source document, accepts draw commands for its
/// pages and serializes the result.
///
/// Pages are 1-based throughout.
pub trait DocumentSink: Send {
    fn page_count(&self) -> u32;

    /// Size of `page` in output units.
    fn page_size(&self, page: u32) -> Result<PageGeometry, RenderError>;

    /// Draws `commands` on top of the existing content of `page`. May be
    /// called more than once per page; later calls paint over earlier ones.
    fn draw_page(&mut self, page: u32, commands: &[DrawCommand]) -> Result<(), RenderError>;

    fn finish(self: Box<Self>) -> Result<Vec<u8>, RenderError>;
}
