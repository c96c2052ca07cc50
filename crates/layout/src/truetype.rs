//! TrueType faces parsed with ttf-parser.
//!
//! Everything the exporter needs is extracted once at load time, so the
//! parsed face does not have to outlive the call and the struct stays free
//! of self-references.

use crate::encoding::{FIRST_CHAR, LAST_CHAR, REPLACEMENT, win_ansi_byte, win_ansi_char};
use crate::metrics::FontMetrics;
use overstamp_traits::{FontError, SharedFontData};

const CODE_COUNT: usize = (LAST_CHAR - FIRST_CHAR) as usize + 1;

/// A TrueType font program plus the metrics of its WinAnsi repertoire.
pub struct TrueTypeFont {
    data: SharedFontData,
    postscript_name: String,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    cap_height: f32,
    bbox: [f32; 4],
    monospaced: bool,
    /// Advance per WinAnsi code (from 32), in font units.
    advances: [u16; CODE_COUNT],
}

impl std::fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl TrueTypeFont {
    pub fn from_data(family: &str, data: SharedFontData) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::LoadFailed {
            family: family.to_string(),
            message: e.to_string(),
        })?;

        let units_per_em = face.units_per_em() as f32;
        let notdef = face.glyph_hor_advance(ttf_parser::GlyphId(0)).unwrap_or(0);
        let mut advances = [0u16; CODE_COUNT];
        for (i, slot) in advances.iter_mut().enumerate() {
            let code = FIRST_CHAR + i as u8;
            *slot = win_ansi_char(code)
                .map(|c| {
                    face.glyph_index(c)
                        .and_then(|g| face.glyph_hor_advance(g))
                        .unwrap_or(notdef)
                })
                .unwrap_or(0);
        }

        let bbox = face.global_bounding_box();
        let postscript_name = extract_postscript_name(&face)
            .unwrap_or_else(|| family.split_whitespace().collect::<String>());

        log::debug!(
            "Parsed TrueType font '{}' ({} bytes, {} units/em)",
            postscript_name,
            data.len(),
            units_per_em
        );

        Ok(Self {
            postscript_name,
            units_per_em,
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            cap_height: face.capital_height().unwrap_or(face.ascender()) as f32,
            bbox: [
                bbox.x_min as f32,
                bbox.y_min as f32,
                bbox.x_max as f32,
                bbox.y_max as f32,
            ],
            monospaced: face.is_monospaced(),
            advances,
            data,
        })
    }

    pub fn data(&self) -> &SharedFontData {
        &self.data
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn is_monospaced(&self) -> bool {
        self.monospaced
    }

    fn to_thousandths(&self, units: f32) -> f32 {
        units * 1000.0 / self.units_per_em
    }

    /// `/Widths` entries for codes 32..=255, in 1/1000 em.
    pub fn pdf_widths(&self) -> Vec<f32> {
        self.advances
            .iter()
            .map(|&a| self.to_thousandths(a as f32).round())
            .collect()
    }

    /// `/CapHeight` in 1/1000 em.
    pub fn pdf_cap_height(&self) -> f32 {
        self.to_thousandths(self.cap_height).round()
    }

    /// `/FontBBox` in 1/1000 em.
    pub fn pdf_bbox(&self) -> [f32; 4] {
        self.bbox.map(|v| self.to_thousandths(v).round())
    }

    fn code_advance(&self, byte: u8) -> u16 {
        if byte < FIRST_CHAR {
            return 0;
        }
        self.advances[(byte - FIRST_CHAR) as usize]
    }
}

impl FontMetrics for TrueTypeFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| self.code_advance(win_ansi_byte(c).unwrap_or(REPLACEMENT)) as u32)
            .sum();
        units as f32 * size / self.units_per_em
    }

    fn ascent(&self, size: f32) -> f32 {
        self.ascender * size / self.units_per_em
    }

    fn descent(&self, size: f32) -> f32 {
        -self.descender * size / self.units_per_em
    }
}

/// PostScript name (name id 6), falling back to the full name and then the
/// family name with spaces removed.
fn extract_postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    let find = |id: u16| {
        face.names()
            .into_iter()
            .filter(|n| n.name_id == id)
            .find_map(|n| n.to_string())
    };

    find(ttf_parser::name_id::POST_SCRIPT_NAME)
        .or_else(|| find(ttf_parser::name_id::FULL_NAME).map(|n| n.replace(' ', "")))
        .or_else(|| find(ttf_parser::name_id::FAMILY).map(|n| n.replace(' ', "")))
        .filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_garbage_data_is_a_load_error() {
        let result = TrueTypeFont::from_data("Inter", Arc::new(vec![0, 1, 2, 3]));
        assert!(matches!(result, Err(FontError::LoadFailed { .. })));
    }

    #[test]
    fn test_empty_data_is_a_load_error() {
        assert!(TrueTypeFont::from_data("Inter", Arc::new(Vec::new())).is_err());
    }
}
