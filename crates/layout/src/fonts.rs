//! Font resolution for the exporter.
//!
//! A CSS family stack is reduced to one of a handful of output fonts. The
//! three base-14 faces are always available; Inter is a TrueType program that
//! has to come from a [`FontProvider`] (or, with the `system-fonts` feature,
//! from a fontdb database). When it cannot be loaded the library substitutes
//! its fallback standard font and reports the substitution instead of failing.

use crate::metrics::{FontMetrics, StandardFont};
use crate::truetype::TrueTypeFont;
use overstamp_model::FontFamily;
use overstamp_traits::{FontError, FontProvider, SharedFontData};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// The output fonts a family stack can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKey {
    Inter,
    Helvetica,
    Times,
    Courier,
}

impl FontKey {
    /// Case-insensitive substring match over the whole family stack.
    pub fn from_family(family: &str) -> Self {
        let lower = family.to_lowercase();
        if lower.contains("inter") {
            FontKey::Inter
        } else if lower.contains("courier") {
            FontKey::Courier
        } else if lower.contains("georgia") || lower.contains("times") {
            FontKey::Times
        } else {
            FontKey::Helvetica
        }
    }

    /// The base-14 face for this key, if it is one.
    pub fn standard(self) -> Option<StandardFont> {
        match self {
            FontKey::Inter => None,
            FontKey::Helvetica => Some(StandardFont::Helvetica),
            FontKey::Times => Some(StandardFont::TimesRoman),
            FontKey::Courier => Some(StandardFont::Courier),
        }
    }

    /// Family name used to ask providers for the font program.
    pub fn family_name(self) -> &'static str {
        match self {
            FontKey::Inter => "Inter",
            FontKey::Helvetica => "Helvetica",
            FontKey::Times => "Times",
            FontKey::Courier => "Courier",
        }
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family_name())
    }
}

/// A font ready to measure with and to register in the output document.
#[derive(Debug, Clone)]
pub enum LoadedFont {
    Standard(StandardFont),
    TrueType(Arc<TrueTypeFont>),
}

impl LoadedFont {
    /// `/BaseFont` name.
    pub fn base_font(&self) -> &str {
        match self {
            LoadedFont::Standard(f) => f.base_font(),
            LoadedFont::TrueType(f) => f.postscript_name(),
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, LoadedFont::TrueType(_))
    }
}

impl PartialEq for LoadedFont {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadedFont::Standard(a), LoadedFont::Standard(b)) => a == b,
            (LoadedFont::TrueType(a), LoadedFont::TrueType(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl FontMetrics for LoadedFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        match self {
            LoadedFont::Standard(f) => f.text_width(text, size),
            LoadedFont::TrueType(f) => f.text_width(text, size),
        }
    }

    fn ascent(&self, size: f32) -> f32 {
        match self {
            LoadedFont::Standard(f) => f.ascent(size),
            LoadedFont::TrueType(f) => f.ascent(size),
        }
    }

    fn descent(&self, size: f32) -> f32 {
        match self {
            LoadedFont::Standard(f) => f.descent(size),
            LoadedFont::TrueType(f) => f.descent(size),
        }
    }
}

/// Outcome of resolving a family stack.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub requested: FontKey,
    pub font: LoadedFont,
    /// True when `requested` could not be loaded and `font` is the fallback.
    pub substituted: bool,
}

/// Loads and caches the fonts the exporter draws with.
#[derive(Clone)]
pub struct FontLibrary {
    providers: Vec<Arc<dyn FontProvider>>,

    #[cfg(feature = "system-fonts")]
    db: Arc<RwLock<fontdb::Database>>,

    /// Successfully parsed TrueType faces. Failures are not cached so a later
    /// export can retry a provider that was temporarily unavailable.
    cache: Arc<RwLock<HashMap<FontKey, Arc<TrueTypeFont>>>>,

    fallback: StandardFont,
}

impl fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontLibrary")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    /// A library with no font sources; only the standard fonts resolve.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            #[cfg(feature = "system-fonts")]
            db: Arc::new(RwLock::new(fontdb::Database::new())),
            cache: Arc::new(RwLock::new(HashMap::new())),
            fallback: StandardFont::Helvetica,
        }
    }

    /// Adds a provider. Providers are consulted in insertion order, before
    /// any fontdb source.
    pub fn with_provider(mut self, provider: Arc<dyn FontProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_fallback(mut self, fallback: StandardFont) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> StandardFont {
        self.fallback
    }

    /// Loads the platform's installed fonts into the fontdb database.
    #[cfg(feature = "system-fonts")]
    pub fn with_system_fonts(self, enable: bool) -> Self {
        if enable && let Ok(mut db) = self.db.write() {
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
        }
        self
    }

    #[cfg(feature = "system-fonts")]
    pub fn add_font_dir<P: AsRef<std::path::Path>>(&self, path: P) {
        if let Ok(mut db) = self.db.write() {
            let before = db.len();
            db.load_fonts_dir(path.as_ref());
            log::debug!(
                "Loaded {} font faces from {}",
                db.len() - before,
                path.as_ref().display()
            );
        }
    }

    /// Resolves a family stack, substituting the fallback font on failure.
    pub fn resolve(&self, family: &FontFamily) -> ResolvedFont {
        self.resolve_key(FontKey::from_family(family.as_str()))
    }

    pub fn resolve_key(&self, key: FontKey) -> ResolvedFont {
        if let Some(standard) = key.standard() {
            return ResolvedFont {
                requested: key,
                font: LoadedFont::Standard(standard),
                substituted: false,
            };
        }

        match self.load_truetype(key) {
            Ok(font) => ResolvedFont {
                requested: key,
                font: LoadedFont::TrueType(font),
                substituted: false,
            },
            Err(e) => {
                log::warn!(
                    "Font '{}' unavailable, substituting {}: {}",
                    key,
                    self.fallback.base_font(),
                    e
                );
                ResolvedFont {
                    requested: key,
                    font: LoadedFont::Standard(self.fallback),
                    substituted: true,
                }
            }
        }
    }

    /// Loads the TrueType program for `key`.
    ///
    /// Resolution order:
    /// 1. Cache
    /// 2. Providers, in insertion order
    /// 3. fontdb (with the `system-fonts` feature)
    pub fn load_truetype(&self, key: FontKey) -> Result<Arc<TrueTypeFont>, FontError> {
        if let Ok(cache) = self.cache.read()
            && let Some(font) = cache.get(&key)
        {
            return Ok(font.clone());
        }

        let family = key.family_name();
        let data = self.load_font_data(family)?;
        let font = Arc::new(TrueTypeFont::from_data(family, data)?);

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, font.clone());
        }
        Ok(font)
    }

    fn load_font_data(&self, family: &str) -> Result<SharedFontData, FontError> {
        let mut last_error = None;
        for provider in &self.providers {
            if !provider.has_font(family) {
                continue;
            }
            match provider.load_font(family) {
                Ok(data) => {
                    log::debug!("Font '{}' loaded via {}", family, provider.name());
                    return Ok(data);
                }
                Err(e) => {
                    log::debug!("Provider {} failed for '{}': {}", provider.name(), family, e);
                    last_error = Some(e);
                }
            }
        }

        #[cfg(feature = "system-fonts")]
        if let Some(data) = self.load_from_fontdb(family) {
            log::debug!("Font '{}' loaded from fontdb", family);
            return Ok(data);
        }

        Err(last_error.unwrap_or_else(|| FontError::NotFound(family.to_string())))
    }

    #[cfg(feature = "system-fonts")]
    fn load_from_fontdb(&self, family: &str) -> Option<SharedFontData> {
        let db = self.db.read().ok()?;
        let id = db.query(&fontdb::Query {
            families: &[fontdb::Family::Name(family)],
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })?;
        db.with_face_data(id, |data, _index| Arc::new(data.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overstamp_traits::InMemoryFontProvider;

    #[derive(Debug)]
    struct UnreachableProvider;

    impl FontProvider for UnreachableProvider {
        fn load_font(&self, family: &str) -> Result<SharedFontData, FontError> {
            Err(FontError::LoadFailed {
                family: family.to_string(),
                message: "connection refused".to_string(),
            })
        }

        fn has_font(&self, _family: &str) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_family_stacks_map_by_substring() {
        assert_eq!(FontKey::from_family("Inter, system-ui, sans-serif"), FontKey::Inter);
        assert_eq!(FontKey::from_family("Arial, sans-serif"), FontKey::Helvetica);
        assert_eq!(FontKey::from_family("Georgia, serif"), FontKey::Times);
        assert_eq!(FontKey::from_family("'Times New Roman'"), FontKey::Times);
        assert_eq!(FontKey::from_family("Courier New, monospace"), FontKey::Courier);
        assert_eq!(FontKey::from_family("COURIER"), FontKey::Courier);
        assert_eq!(FontKey::from_family("Comic Sans MS"), FontKey::Helvetica);
        assert_eq!(FontKey::from_family(""), FontKey::Helvetica);
    }

    #[test]
    fn test_standard_fonts_never_substitute() {
        let library = FontLibrary::new();
        let resolved = library.resolve(&FontFamily::new(FontFamily::GEORGIA));
        assert!(!resolved.substituted);
        assert_eq!(resolved.font, LoadedFont::Standard(StandardFont::TimesRoman));
        assert_eq!(resolved.font.base_font(), "Times-Roman");
        assert!(!resolved.font.is_embedded());
    }

    #[test]
    fn test_failing_provider_falls_back_to_helvetica() {
        init_logger();
        let library = FontLibrary::new().with_provider(Arc::new(UnreachableProvider));
        let resolved = library.resolve(&FontFamily::new(FontFamily::INTER));
        assert_eq!(resolved.requested, FontKey::Inter);
        assert!(resolved.substituted);
        assert_eq!(resolved.font, LoadedFont::Standard(StandardFont::Helvetica));
    }

    #[test]
    fn test_unparseable_font_data_falls_back() {
        init_logger();
        let provider = InMemoryFontProvider::new();
        provider.add_font("Inter", vec![0xde, 0xad, 0xbe, 0xef]).unwrap();
        let library = FontLibrary::new()
            .with_provider(Arc::new(provider))
            .with_fallback(StandardFont::Courier);

        let resolved = library.resolve(&FontFamily::new(FontFamily::INTER));
        assert!(resolved.substituted);
        assert_eq!(resolved.font, LoadedFont::Standard(StandardFont::Courier));
    }

    #[test]
    fn test_no_sources_is_not_found() {
        let library = FontLibrary::new();
        assert!(matches!(
            library.load_truetype(FontKey::Inter),
            Err(FontError::NotFound(_))
        ));
    }
}
