use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Horizontal alignment of each line inside a text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A CSS `font-family` stack such as `"Georgia, serif"`.
///
/// The value is kept verbatim; which output font it maps to is decided at
/// export time by substring matching, so arbitrary stacks are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontFamily(Arc<str>);

/// A family offered by the editor's picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPreset {
    pub label: &'static str,
    pub stack: &'static str,
}

impl FontFamily {
    pub const INTER: &'static str = "Inter, system-ui, sans-serif";
    pub const ARIAL: &'static str = "Arial, sans-serif";
    pub const GEORGIA: &'static str = "Georgia, serif";
    pub const COURIER_NEW: &'static str = "Courier New, monospace";

    pub const PRESETS: [FontPreset; 4] = [
        FontPreset { label: "Inter", stack: Self::INTER },
        FontPreset { label: "Arial", stack: Self::ARIAL },
        FontPreset { label: "Georgia", stack: Self::GEORGIA },
        FontPreset { label: "Courier New", stack: Self::COURIER_NEW },
    ];

    pub fn new(stack: impl Into<Arc<str>>) -> Self {
        Self(stack.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        Self::new(Self::INTER)
    }
}

impl From<&str> for FontFamily {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FontFamily {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
