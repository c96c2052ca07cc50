use crate::afm::{COURIER_WIDTH, HELVETICA_WIDTHS, TIMES_ROMAN_WIDTHS};
use crate::encoding::{FIRST_CHAR, REPLACEMENT, win_ansi_byte};

/// Horizontal and vertical measurements of a font at a given size.
///
/// Widths are what the output document will actually advance by when the
/// string is drawn, so characters the font cannot encode are measured as
/// their replacement.
pub trait FontMetrics: Send + Sync {
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// Distance from the baseline to the top of the tallest glyphs.
    fn ascent(&self, size: f32) -> f32;

    /// Distance from the baseline down to the lowest descender, as a
    /// positive number.
    fn descent(&self, size: f32) -> f32;
}

/// The three base-14 faces the exporter can always draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    TimesRoman,
    Courier,
}

impl StandardFont {
    /// The `/BaseFont` name in a PDF font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::Courier => "Courier",
        }
    }

    /// Advance of a single WinAnsi code, in 1/1000 em.
    pub fn code_width(self, byte: u8) -> u16 {
        if byte < FIRST_CHAR {
            return 0;
        }
        let index = (byte - FIRST_CHAR) as usize;
        match self {
            StandardFont::Helvetica => HELVETICA_WIDTHS[index],
            StandardFont::TimesRoman => TIMES_ROMAN_WIDTHS[index],
            StandardFont::Courier => COURIER_WIDTH,
        }
    }

    fn vertical(self) -> (f32, f32) {
        match self {
            StandardFont::Helvetica => (718.0, 207.0),
            StandardFont::TimesRoman => (683.0, 217.0),
            StandardFont::Courier => (629.0, 157.0),
        }
    }
}

impl FontMetrics for StandardFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| self.code_width(win_ansi_byte(c).unwrap_or(REPLACEMENT)) as u32)
            .sum();
        units as f32 * size / 1000.0
    }

    fn ascent(&self, size: f32) -> f32 {
        self.vertical().0 * size / 1000.0
    }

    fn descent(&self, size: f32) -> f32 {
        self.vertical().1 * size / 1000.0
    }
}
