//! Display space to document space.
//!
//! Annotations store unit coordinates relative to the page as it was rendered
//! when they were placed, together with that rendered size. Document pages
//! have their own absolute size, a bottom-left origin and Y growing upwards.

use overstamp_layout::{
    BASELINE_RATIO, FontMetrics, LoadedFont, TextBlock, TextBlockParams, layout_text_block,
};
use overstamp_model::{ImageAnnotation, Placement, TextAnnotation};
use overstamp_render_core::utils::{box_bottom, flip_y};
use overstamp_render_core::{ImagePlacement, PageGeometry, TextRun};
use image::RgbaImage;
use overstamp_types::{Rect, clamp_within};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tunables of the transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformSettings {
    /// Baseline offset below the top of the first line, as a fraction of the
    /// scaled font size.
    pub baseline_ratio: f32,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self { baseline_ratio: BASELINE_RATIO }
    }
}

/// Ratio of document units to placement-time display pixels on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    /// A non-positive display dimension is treated as already being in
    /// document units.
    pub fn between(placement: &Placement, page: PageGeometry) -> Self {
        let axis = |page_extent: f32, display: f32| {
            if display > 0.0 && display.is_finite() {
                page_extent / display
            } else {
                1.0
            }
        };
        Self {
            x: axis(page.width, placement.display_width()),
            y: axis(page.height, placement.display_height()),
        }
    }
}

/// A text annotation laid out in document space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTransform {
    pub scale: Scale,
    /// Font size in document units.
    pub size: f32,
    pub container_left_x: f32,
    /// Baseline of line 0 after clamping into `[size, page_height]`.
    pub first_baseline: f32,
    pub block: TextBlock,
    /// One run per non-blank line, top to bottom.
    pub runs: Vec<TextRun>,
    /// Bounding box of the whole block, Y up.
    pub extent: Rect,
}

/// Lays out `text` on `page` with `font` and produces its draw commands.
pub fn transform_text(
    text: &TextAnnotation,
    page: PageGeometry,
    font: &LoadedFont,
    settings: &TransformSettings,
) -> TextTransform {
    let placement = text.placement();
    let scale = Scale::between(placement, page);
    let size = text.font_size() * scale.y;

    let params = TextBlockParams::new(size, text.line_height(), text.text_align())
        .with_measured_height(text.measured().map(|m| m.height * scale.y))
        .with_baseline_ratio(settings.baseline_ratio);
    let block = layout_text_block(text.text(), &params, font as &dyn FontMetrics);

    let container_left_x = placement.x() * page.width;
    let text_top_y = flip_y(placement.y() * page.height, page.height);
    let first_baseline = clamp_within(
        text_top_y - size * settings.baseline_ratio,
        size,
        page.height,
    );
    let advance = params.line_advance();

    let runs = block
        .drawable_lines()
        .map(|(i, line)| {
            let line_x = container_left_x + line.offset_x;
            TextRun {
                text: line.text.clone(),
                x: clamp_within(line_x, 0.0, page.width - line.width),
                y: first_baseline - i as f32 * advance,
                size,
                font: font.clone(),
                color: text.color(),
            }
        })
        .collect();

    let extent = Rect::new(
        container_left_x,
        text_top_y - block.height,
        block.container_width,
        block.height,
    );

    TextTransform {
        scale,
        size,
        container_left_x,
        first_baseline,
        block,
        runs,
        extent,
    }
}

/// Places a decoded image on `page`. Position and size scale linearly.
pub fn transform_image(
    image: &ImageAnnotation,
    page: PageGeometry,
    pixels: Arc<RgbaImage>,
) -> ImagePlacement {
    let placement = image.placement();
    let scale = Scale::between(placement, page);
    let width = image.width() * scale.x;
    let height = image.height() * scale.y;

    ImagePlacement {
        source: image.image_src().clone(),
        pixels,
        x: placement.x() * page.width,
        y: box_bottom(placement.y() * page.height, height, page.height),
        width,
        height,
    }
}

/// Bounding box of an image placement, Y up.
pub fn image_extent(placement: &ImagePlacement) -> Rect {
    Rect::new(placement.x, placement.y, placement.width, placement.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use overstamp_layout::StandardFont;
    use overstamp_model::{NewImage, NewText, TextAlign, TextDefaults};
    use overstamp_types::{NormalizedPoint, Size};

    const PAGE: PageGeometry = PageGeometry::LETTER;

    fn helvetica() -> LoadedFont {
        LoadedFont::Standard(StandardFont::Helvetica)
    }

    fn text_at(x: f32, y: f32, display: Size, content: &str) -> NewText {
        NewText::new(1, NormalizedPoint::new(x, y), display, content)
    }

    #[test]
    fn test_scale_factors() {
        let text = text_at(0.0, 0.0, Size::new(1224.0, 1584.0), "a")
            .into_annotation(&TextDefaults::default());
        let scale = Scale::between(text.placement(), PAGE);
        assert_eq!(scale.x, 0.5);
        assert_eq!(scale.y, 0.5);

        let legacy = text_at(0.0, 0.0, Size::zero(), "a").into_annotation(&TextDefaults::default());
        assert_eq!(Scale::between(legacy.placement(), PAGE), Scale { x: 1.0, y: 1.0 });
    }

    #[test]
    fn test_font_size_scales_with_height() {
        let text = text_at(0.1, 0.1, Size::new(612.0, 396.0), "Hi")
            .with_font_size(12.0)
            .into_annotation(&TextDefaults::default());
        let out = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        assert_eq!(out.size, 24.0);
        assert!((out.block.container_width - helvetica().text_width("Hi", 24.0)).abs() < 1e-4);
    }

    #[test]
    fn test_first_baseline_below_top() {
        let text = text_at(0.25, 0.5, Size::new(612.0, 792.0), "Hello")
            .with_font_size(10.0)
            .into_annotation(&TextDefaults::default());
        let out = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        assert_eq!(out.container_left_x, 153.0);
        assert!((out.first_baseline - 388.0).abs() < 1e-4);
        assert_eq!(out.runs.len(), 1);
        assert_eq!(out.runs[0].x, 153.0);
        assert_eq!(out.runs[0].y, out.first_baseline);
    }

    #[test]
    fn test_first_baseline_is_clamped_into_the_page() {
        let bottom = text_at(0.0, 1.0, Size::new(612.0, 792.0), "low")
            .with_font_size(10.0)
            .into_annotation(&TextDefaults::default());
        let out = transform_text(&bottom, PAGE, &helvetica(), &TransformSettings::default());
        assert_eq!(out.first_baseline, 10.0);
    }

    #[test]
    fn test_center_alignment_is_symmetric_about_container() {
        let text = text_at(0.2, 0.2, Size::new(612.0, 792.0), "Centered")
            .with_text_align(TextAlign::Center)
            .into_annotation(&TextDefaults::default());
        let out = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        let run = &out.runs[0];
        let line_width = out.block.lines[0].width;
        let center = run.x + line_width / 2.0;
        let expected = out.container_left_x + out.block.container_width / 2.0;
        assert!((center - expected).abs() <= 1.0);
    }

    #[test]
    fn test_right_alignment_offsets_shorter_lines() {
        let text = text_at(0.1, 0.1, Size::new(612.0, 792.0), "wide line\nx")
            .with_text_align(TextAlign::Right)
            .into_annotation(&TextDefaults::default());
        let out = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        let w = out.block.lines[1].width;
        let big_w = out.block.container_width;
        assert!((out.runs[1].x - (out.container_left_x + big_w - w)).abs() < 1e-3);
    }

    #[test]
    fn test_lines_are_clamped_to_the_right_edge() {
        let text = text_at(0.99, 0.1, Size::new(612.0, 792.0), "overflowing")
            .into_annotation(&TextDefaults::default());
        let out = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        let w = out.block.lines[0].width;
        assert!((out.runs[0].x - (PAGE.width - w)).abs() < 1e-3);
    }

    #[test]
    fn test_blank_lines_advance_without_runs() {
        let text = text_at(0.1, 0.1, Size::new(612.0, 792.0), "A\n\nC\n")
            .with_font_size(10.0)
            .with_line_height(1.5)
            .into_annotation(&TextDefaults::default());
        let out = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        assert_eq!(out.runs.len(), 2);
        assert!((out.runs[0].y - out.runs[1].y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_extent_prefers_measured_height() {
        let mut text = text_at(0.0, 0.0, Size::new(306.0, 396.0), "A\nB")
            .with_font_size(10.0)
            .into_annotation(&TextDefaults::default());
        let estimated = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        assert!((estimated.extent.height - 2.0 * 20.0 * 1.2).abs() < 1e-3);

        text.record_measurement(Size::new(40.0, 50.0));
        let measured = transform_text(&text, PAGE, &helvetica(), &TransformSettings::default());
        assert_eq!(measured.extent.height, 100.0);
        assert_eq!(measured.extent.y, 792.0 - 100.0);
    }

    #[test]
    fn test_image_scales_and_flips() {
        let image = NewImage::new(
            1,
            NormalizedPoint::new(0.5, 0.25),
            Size::new(306.0, 396.0),
            "/signatures/a.png",
            Size::new(100.0, 40.0),
        )
        .into_annotation();
        let pixels = Arc::new(RgbaImage::new(2, 2));
        let placed = transform_image(&image, PAGE, pixels);
        assert_eq!(placed.x, 306.0);
        assert_eq!(placed.width, 200.0);
        assert_eq!(placed.height, 80.0);
        assert_eq!(placed.y, 792.0 - 198.0 - 80.0);
        assert_eq!(image_extent(&placed).height, 80.0);
    }
}
