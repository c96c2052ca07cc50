use crate::config::OverstampConfig;
use crate::error::OverstampError;
use crate::exporter::Exporter;
use crate::session::DocumentSession;
use overstamp_layout::FontLibrary;
use overstamp_resource::{ChainedResourceProvider, DataUriResourceProvider, FilesystemResourceProvider};
use overstamp_store::PlacementStore;
use overstamp_traits::{FontProvider, ResourceProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Assembles a [`DocumentSession`] and the [`Exporter`] that bakes it.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: OverstampConfig,
    font_providers: Vec<Arc<dyn FontProvider>>,
    resource_providers: Vec<Arc<dyn ResourceProvider>>,
    #[cfg(feature = "remote")]
    remote: bool,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: OverstampConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_config_json(self, json: &str) -> Result<Self, OverstampError> {
        Ok(self.with_config(OverstampConfig::from_json(json)?))
    }

    pub fn with_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, OverstampError> {
        Ok(self.with_config(OverstampConfig::from_file(path)?))
    }

    /// Font providers are asked in registration order before any system or
    /// directory fonts.
    pub fn with_font_provider(mut self, provider: Arc<dyn FontProvider>) -> Self {
        self.font_providers.push(provider);
        self
    }

    /// Resource providers are asked in registration order before the
    /// configured resource root.
    pub fn with_resource_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.resource_providers.push(provider);
        self
    }

    /// Image locations like `/signatures/me.png` resolve below `path`.
    pub fn with_resource_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.resource_root = Some(path.into());
        self
    }

    /// Scans a directory for `.ttf`/`.otf` faces.
    pub fn with_font_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.fonts.font_dirs.push(path.into());
        self
    }

    /// Scans the platform's installed fonts. Ignored without the
    /// `system-fonts` feature.
    pub fn with_system_fonts(mut self, system_fonts: bool) -> Self {
        self.config.fonts.system_fonts = system_fonts;
        self
    }

    /// Fetches Inter and `http(s)://` images over the network.
    #[cfg(feature = "remote")]
    pub fn with_remote(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    pub fn config(&self) -> &OverstampConfig {
        &self.config
    }

    pub fn build(self) -> (DocumentSession, Exporter) {
        let fonts = self.font_library();
        let resources = self.resource_chain();
        let store = PlacementStore::with_defaults(self.config.placement.clone());
        let session = DocumentSession::new(self.config.upload.clone(), store);
        let exporter = Exporter::new(fonts, Arc::new(resources))
            .with_settings(self.config.export.transform);
        (session, exporter)
    }

    fn font_library(&self) -> FontLibrary {
        let mut fonts = FontLibrary::new().with_fallback(self.config.export.fallback());
        for provider in &self.font_providers {
            fonts = fonts.with_provider(Arc::clone(provider));
        }
        #[cfg(feature = "remote")]
        if self.remote {
            fonts = fonts.with_provider(Arc::new(overstamp_resource::RemoteFontProvider::default()));
        }
        #[cfg(feature = "system-fonts")]
        {
            fonts = fonts.with_system_fonts(self.config.fonts.system_fonts);
            for dir in &self.config.fonts.font_dirs {
                fonts.add_font_dir(dir);
            }
        }
        #[cfg(not(feature = "system-fonts"))]
        if self.config.fonts.system_fonts || !self.config.fonts.font_dirs.is_empty() {
            log::warn!("Font directories and system fonts need the `system-fonts` feature");
        }
        fonts
    }

    fn resource_chain(&self) -> ChainedResourceProvider {
        let mut chain = ChainedResourceProvider::new();
        for provider in &self.resource_providers {
            chain.push(Arc::clone(provider));
        }
        chain.push(Arc::new(DataUriResourceProvider::new()));
        if let Some(root) = &self.config.resource_root {
            chain.push(Arc::new(FilesystemResourceProvider::new(root)));
        }
        #[cfg(feature = "remote")]
        if self.remote {
            chain.push(Arc::new(overstamp_resource::HttpResourceProvider::new()));
        }
        log::debug!("Resource chain has {} providers", chain.len());
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overstamp_layout::StandardFont;

    #[test]
    fn test_build_applies_config() {
        let (session, exporter) = SessionBuilder::new()
            .with_config_json(
                r#"{ "upload": { "maxBytes": 10 }, "export": { "fallbackFont": "Courier" },
                     "placement": { "imageWidth": 120 } }"#,
            )
            .unwrap()
            .with_system_fonts(false)
            .build();
        assert_eq!(session.policy().max_bytes, 10);
        assert_eq!(session.store().defaults().image_width, 120.0);
        assert_eq!(exporter.fonts().fallback(), StandardFont::Courier);
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            SessionBuilder::new().with_config_file("/definitely/not/here.json"),
            Err(OverstampError::Io(_))
        ));
    }
}
