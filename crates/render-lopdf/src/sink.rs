use crate::content::{image_operations, text_operations};
use lopdf::content::{Content, Operation};
use lopdf::{Document, ObjectId};
use overstamp_layout::{FontMetrics, LoadedFont};
use overstamp_pdf_composer::{
    ComposerError, PageResources, TrueTypeProgram, add_rgba_image, add_standard_font,
    add_truetype_font, overlay_content, page_dimensions, page_origin,
};
use overstamp_render_core::{DocumentSink, DrawCommand, ImagePlacement, PageGeometry, RenderError};
use overstamp_types::ResourceUri;
use std::collections::{BTreeMap, HashMap};

const FONT_PREFIX: &str = "OvF";
const IMAGE_PREFIX: &str = "OvIm";

/// A loaded PDF that draw commands are stamped onto.
///
/// Font and image objects are shared across pages: each distinct font and
/// each distinct image source is written to the document once.
pub struct LopdfSink {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
    fonts: HashMap<String, ObjectId>,
    images: HashMap<ResourceUri, ObjectId>,
}

impl std::fmt::Debug for LopdfSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfSink")
            .field("pages", &self.pages.len())
            .field("fonts", &self.fonts.len())
            .field("images", &self.images.len())
            .finish()
    }
}

impl LopdfSink {
    /// Parses `bytes` as a PDF document.
    pub fn load(bytes: &[u8]) -> Result<Self, RenderError> {
        let doc = Document::load_mem(bytes)?;
        Ok(Self::from_document(doc))
    }

    pub fn from_document(doc: Document) -> Self {
        let pages = doc.get_pages();
        log::debug!("Loaded document with {} pages", pages.len());
        Self {
            doc,
            pages,
            fonts: HashMap::new(),
            images: HashMap::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn page_id(&self, page: u32) -> Result<ObjectId, RenderError> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(RenderError::PageOutOfRange {
                page,
                page_count: self.page_count(),
            })
    }

    fn font_object(&mut self, font: &LoadedFont) -> Result<ObjectId, RenderError> {
        let base_font = font.base_font().to_string();
        if let Some(id) = self.fonts.get(&base_font) {
            return Ok(*id);
        }
        let id = match font {
            LoadedFont::Standard(standard) => add_standard_font(&mut self.doc, standard.base_font()),
            LoadedFont::TrueType(tt) => {
                let widths = tt.pdf_widths();
                // Font descriptors measure in 1/1000 em with a negative descent.
                let ascent = tt.ascent(1000.0).round();
                let descent = -tt.descent(1000.0).round();
                let program = TrueTypeProgram {
                    postscript_name: tt.postscript_name(),
                    data: tt.data().as_slice(),
                    first_char: 32,
                    widths: &widths,
                    bbox: tt.pdf_bbox(),
                    ascent,
                    descent,
                    cap_height: tt.pdf_cap_height(),
                    fixed_pitch: tt.is_monospaced(),
                };
                add_truetype_font(&mut self.doc, &program)
            }
        };
        log::debug!("Registered font '{}' as {:?}", base_font, id);
        self.fonts.insert(base_font, id);
        Ok(id)
    }

    fn image_object(&mut self, image: &ImagePlacement) -> Result<ObjectId, RenderError> {
        if let Some(id) = self.images.get(&image.source) {
            return Ok(*id);
        }
        let (width, height) = image.pixels.dimensions();
        let id = add_rgba_image(&mut self.doc, width, height, image.pixels.as_raw())
            .map_err(|e| RenderError::Image(format!("{}: {}", image.source, e)))?;
        log::debug!("Embedded image '{}' ({}x{}) as {:?}", image.source, width, height, id);
        self.images.insert(image.source.clone(), id);
        Ok(id)
    }
}

fn composer_error(page: u32, err: ComposerError) -> RenderError {
    match err {
        ComposerError::MissingMediaBox(_) => RenderError::MissingMediaBox(page),
        other => RenderError::Pdf(other.to_string()),
    }
}

impl DocumentSink for LopdfSink {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, page: u32) -> Result<PageGeometry, RenderError> {
        let page_id = self.page_id(page)?;
        let (width, height) =
            page_dimensions(&self.doc, page_id).map_err(|e| composer_error(page, e))?;
        Ok(PageGeometry::new(width, height))
    }

    fn draw_page(&mut self, page: u32, commands: &[DrawCommand]) -> Result<(), RenderError> {
        let page_id = self.page_id(page)?;
        if commands.is_empty() {
            return Ok(());
        }

        let mut resources =
            PageResources::load(&self.doc, page_id).map_err(|e| composer_error(page, e))?;
        let mut operations: Vec<Operation> = Vec::new();
        // Draw commands are relative to the MediaBox's lower-left corner.
        let (origin_x, origin_y) =
            page_origin(&self.doc, page_id).map_err(|e| composer_error(page, e))?;
        if origin_x != 0.0 || origin_y != 0.0 {
            operations.push(Operation::new(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), origin_x.into(), origin_y.into()],
            ));
        }
        for command in commands {
            match command {
                DrawCommand::Text(run) => {
                    let font_id = self.font_object(&run.font)?;
                    let name = resources.add_font(FONT_PREFIX, font_id);
                    operations.extend(text_operations(
                        &name, run.size, run.color, run.x, run.y, &run.text,
                    ));
                }
                DrawCommand::Image(image) => {
                    let image_id = self.image_object(image)?;
                    let name = resources.add_xobject(IMAGE_PREFIX, image_id);
                    operations.extend(image_operations(
                        &name,
                        image.x,
                        image.y,
                        image.width,
                        image.height,
                    ));
                }
            }
        }

        let content = Content { operations }.encode()?;
        resources
            .store(&mut self.doc)
            .map_err(|e| composer_error(page, e))?;
        overlay_content(&mut self.doc, page_id, content).map_err(|e| composer_error(page, e))?;
        log::debug!("Stamped {} commands onto page {}", commands.len(), page);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, RenderError> {
        let mut doc = self.doc;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}
