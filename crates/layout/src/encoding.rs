//! WinAnsiEncoding, the single-byte encoding every output font uses.
//!
//! Characters outside the encoding are drawn (and measured) as `?`.

/// Code points for bytes 0x80..=0x9F, where WinAnsi departs from Latin-1.
/// `None` marks the five unassigned slots.
const HIGH_CONTROL_RANGE: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

pub const REPLACEMENT: u8 = b'?';

/// First and last codes given widths in embedded font dictionaries.
pub const FIRST_CHAR: u8 = 32;
pub const LAST_CHAR: u8 = 255;

/// The WinAnsi byte for `c`, if the encoding has one.
pub fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(c as u8),
        _ => HIGH_CONTROL_RANGE
            .iter()
            .position(|slot| *slot == Some(c))
            .map(|i| 0x80 + i as u8),
    }
}

/// The character a WinAnsi byte stands for. Control codes and unassigned
/// slots yield `None`.
pub fn win_ansi_char(byte: u8) -> Option<char> {
    match byte {
        0x20..=0x7E | 0xA0..=0xFF => Some(byte as char),
        0x80..=0x9F => HIGH_CONTROL_RANGE[(byte - 0x80) as usize],
        _ => None,
    }
}

/// Encodes `text` for a `Tj` operand, replacing unencodable characters.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(REPLACEMENT))
        .collect()
}
