//! Turning a set of annotations into per-page draw commands.
//!
//! Planning never fails because of a single annotation: bad page references,
//! empty text and unreadable images become skips, missing fonts become
//! substitutions. Only a sink that cannot describe its own pages aborts.

use crate::report::{DrawnAnnotation, ExportReport, FontSubstitution, SkipReason};
use crate::transform::{TransformSettings, image_extent, transform_image, transform_text};
use image::RgbaImage;
use overstamp_layout::{FontKey, FontLibrary, LoadedFont, ResolvedFont};
use overstamp_model::{Annotation, AnnotationKind, ImageAnnotation, TextAnnotation};
use overstamp_render_core::{DocumentSink, DrawCommand, PageCommands, PageGeometry, RenderError};
use overstamp_traits::ResourceProvider;
use overstamp_types::ResourceUri;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Draw commands grouped by page, plus the report describing them.
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    pub pages: Vec<PageCommands>,
    pub report: ExportReport,
}

impl ExportPlan {
    pub fn commands_for(&self, page: u32) -> Option<&PageCommands> {
        self.pages.iter().find(|p| p.page == page)
    }

    pub fn command_count(&self) -> usize {
        self.pages.iter().map(|p| p.commands.len()).sum()
    }

    /// Sends every page's commands to `sink`.
    pub fn apply(&self, sink: &mut dyn DocumentSink) -> Result<(), RenderError> {
        for page in self.pages.iter().filter(|p| !p.is_empty()) {
            sink.draw_page(page.page, &page.commands)?;
        }
        Ok(())
    }
}

/// Per-export state: each font family and image source is resolved at most
/// once, however many annotations use it.
struct PlanningCache {
    pages: HashMap<u32, PageGeometry>,
    fonts: HashMap<FontKey, ResolvedFont>,
    images: HashMap<ResourceUri, Result<Arc<RgbaImage>, String>>,
}

pub struct ExportPlanner<'a> {
    fonts: &'a FontLibrary,
    resources: &'a dyn ResourceProvider,
    settings: TransformSettings,
}

impl<'a> ExportPlanner<'a> {
    pub fn new(fonts: &'a FontLibrary, resources: &'a dyn ResourceProvider) -> Self {
        Self {
            fonts,
            resources,
            settings: TransformSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TransformSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn plan<'b>(
        &self,
        annotations: impl IntoIterator<Item = &'b Annotation>,
        sink: &dyn DocumentSink,
    ) -> Result<ExportPlan, RenderError> {
        let page_count = sink.page_count();
        let mut cache = PlanningCache {
            pages: HashMap::new(),
            fonts: HashMap::new(),
            images: HashMap::new(),
        };
        let mut pages: BTreeMap<u32, PageCommands> = BTreeMap::new();
        let mut report = ExportReport::default();

        for annotation in annotations {
            let page_number = annotation.page();
            if page_number == 0 || page_number > page_count {
                report.skip(
                    annotation.id(),
                    SkipReason::PageOutOfRange {
                        page: page_number,
                        page_count,
                    },
                );
                continue;
            }

            let page = match cache.pages.get(&page_number) {
                Some(geometry) => *geometry,
                None => {
                    let geometry = sink.page_size(page_number)?;
                    cache.pages.insert(page_number, geometry);
                    geometry
                }
            };
            let commands = &mut pages
                .entry(page_number)
                .or_insert_with(|| PageCommands::new(page_number))
                .commands;

            match annotation {
                Annotation::Text(text) => {
                    self.plan_text(text, page, &mut cache, commands, &mut report)
                }
                Annotation::Image(image) => {
                    self.plan_image(image, page, &mut cache, commands, &mut report)
                }
            }
        }

        log::info!("Export plan: {}", report);
        Ok(ExportPlan {
            pages: pages.into_values().filter(|p| !p.is_empty()).collect(),
            report,
        })
    }

    fn plan_text(
        &self,
        text: &TextAnnotation,
        page: PageGeometry,
        cache: &mut PlanningCache,
        commands: &mut Vec<DrawCommand>,
        report: &mut ExportReport,
    ) {
        let id = text.placement().id();
        if text.text().trim().is_empty() {
            report.skip(id, SkipReason::EmptyText);
            return;
        }

        let key = FontKey::from_family(text.font_family().as_str());
        let resolved = cache
            .fonts
            .entry(key)
            .or_insert_with(|| self.fonts.resolve_key(key));
        if resolved.substituted
            && let LoadedFont::Standard(used) = &resolved.font
        {
            report.substitutions.push(FontSubstitution {
                id,
                requested: key,
                used: *used,
            });
        }

        let out = transform_text(text, page, &resolved.font, &self.settings);
        log::debug!(
            "text {} page={} page_size={}x{} display={}x{} scale=({:.4}, {:.4}) size={:.2} \
             container_left_x={:.2} container_width={:.2} first_baseline={:.2} lines={} font={}",
            id,
            text.placement().page(),
            page.width,
            page.height,
            text.placement().display_width(),
            text.placement().display_height(),
            out.scale.x,
            out.scale.y,
            out.size,
            out.container_left_x,
            out.block.container_width,
            out.first_baseline,
            out.runs.len(),
            resolved.font.base_font(),
        );

        commands.extend(out.runs.into_iter().map(DrawCommand::Text));
        report.drawn.push(DrawnAnnotation {
            id,
            kind: AnnotationKind::Text,
            page: text.placement().page(),
            extent: out.extent,
        });
    }

    fn plan_image(
        &self,
        image: &ImageAnnotation,
        page: PageGeometry,
        cache: &mut PlanningCache,
        commands: &mut Vec<DrawCommand>,
        report: &mut ExportReport,
    ) {
        let id = image.placement().id();
        let source = image.image_src();
        let pixels = cache
            .images
            .entry(source.clone())
            .or_insert_with(|| self.decode_image(source));

        let pixels = match pixels {
            Ok(pixels) => pixels.clone(),
            Err(message) => {
                report.skip(id, SkipReason::ImageUnavailable(message.clone()));
                return;
            }
        };

        let placed = transform_image(image, page, pixels);
        log::debug!(
            "image {} page={} src={} at=({:.2}, {:.2}) size={:.2}x{:.2}",
            id,
            image.placement().page(),
            source,
            placed.x,
            placed.y,
            placed.width,
            placed.height,
        );

        let extent = image_extent(&placed);
        commands.push(DrawCommand::Image(placed));
        report.drawn.push(DrawnAnnotation {
            id,
            kind: AnnotationKind::Image,
            page: image.placement().page(),
            extent,
        });
    }

    fn decode_image(&self, source: &ResourceUri) -> Result<Arc<RgbaImage>, String> {
        let data = self
            .resources
            .load(source.as_str())
            .map_err(|e| e.to_string())?;
        let decoded = image::load_from_memory(&data).map_err(|e| e.to_string())?;
        Ok(Arc::new(decoded.to_rgba8()))
    }
}
