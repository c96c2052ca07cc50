//! FontProvider trait: where TrueType font programs come from.
//!
//! The exporter only needs raw font bytes keyed by family name. Whether they
//! are embedded in the binary, read from disk or downloaded is up to the
//! provider.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Font family not available: {0}")]
    NotFound(String),

    #[error("Failed to load font '{family}': {message}")]
    LoadFailed { family: String, message: String },

    #[error("Invalid font data for '{0}'")]
    InvalidData(String),
}

pub type SharedFontData = Arc<Vec<u8>>;

pub trait FontProvider: Send + Sync + Debug {
    /// Raw TrueType/OpenType bytes for `family`. Lookup is case-insensitive.
    fn load_font(&self, family: &str) -> Result<SharedFontData, FontError>;

    fn has_font(&self, family: &str) -> bool;

    /// Families this provider can serve without further I/O.
    fn list_families(&self) -> Vec<String> {
        Vec::new()
    }

    fn name(&self) -> &'static str;
}

impl<T: FontProvider + ?Sized> FontProvider for Arc<T> {
    fn load_font(&self, family: &str) -> Result<SharedFontData, FontError> {
        (**self).load_font(family)
    }

    fn has_font(&self, family: &str) -> bool {
        (**self).has_font(family)
    }

    fn list_families(&self) -> Vec<String> {
        (**self).list_families()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Fonts registered up front from bytes the embedder already holds.
#[derive(Debug, Default)]
pub struct InMemoryFontProvider {
    fonts: RwLock<HashMap<String, (String, SharedFontData)>>,
}

impl InMemoryFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_font(&self, family: &str, data: Vec<u8>) -> Result<(), FontError> {
        self.add_font_shared(family, Arc::new(data))
    }

    pub fn add_font_shared(&self, family: &str, data: SharedFontData) -> Result<(), FontError> {
        if data.is_empty() {
            return Err(FontError::InvalidData(family.to_string()));
        }
        let mut fonts = self.fonts.write().map_err(|_| FontError::LoadFailed {
            family: family.to_string(),
            message: "font store lock poisoned".to_string(),
        })?;
        fonts.insert(family.to_lowercase(), (family.to_string(), data));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.read().map(|f| f.is_empty()).unwrap_or(true)
    }
}

impl FontProvider for InMemoryFontProvider {
    fn load_font(&self, family: &str) -> Result<SharedFontData, FontError> {
        let fonts = self.fonts.read().map_err(|_| FontError::LoadFailed {
            family: family.to_string(),
            message: "font store lock poisoned".to_string(),
        })?;
        fonts
            .get(&family.to_lowercase())
            .map(|(_, data)| data.clone())
            .ok_or_else(|| FontError::NotFound(family.to_string()))
    }

    fn has_font(&self, family: &str) -> bool {
        self.fonts
            .read()
            .map(|f| f.contains_key(&family.to_lowercase()))
            .unwrap_or(false)
    }

    fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .fonts
            .read()
            .map(|f| f.values().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default();
        families.sort();
        families
    }

    fn name(&self) -> &'static str {
        "InMemoryFontProvider"
    }
}
