//! Library configuration.
//!
//! Every field has a default, so a JSON document only needs the keys it
//! wants to change:
//!
//! ```json
//! { "upload": { "maxBytes": 5242880 }, "export": { "fallbackFont": "Times" } }
//! ```

use crate::error::{OverstampError, UploadError};
use overstamp_export::TransformSettings;
use overstamp_layout::{FontKey, StandardFont};
use overstamp_store::PlacementDefaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverstampConfig {
    pub upload: UploadPolicy,
    pub placement: PlacementDefaults,
    pub export: ExportConfig,
    pub fonts: FontConfig,
    /// Directory image locations such as `/signatures/me.png` resolve against.
    pub resource_root: Option<PathBuf>,
}

impl OverstampConfig {
    pub fn from_json(json: &str) -> Result<Self, OverstampError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OverstampError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// What the upload boundary accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub accepted_media_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            accepted_media_types: vec![PDF_MEDIA_TYPE.to_string()],
        }
    }
}

impl UploadPolicy {
    /// Media type parameters (`; charset=...`) and case are ignored.
    pub fn check(&self, media_type: &str, size: u64) -> Result<(), UploadError> {
        let essence = media_type.split(';').next().unwrap_or("").trim();
        if !self
            .accepted_media_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(essence))
        {
            return Err(UploadError::WrongMediaType {
                media_type: media_type.to_string(),
            });
        }
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    #[serde(flatten)]
    pub transform: TransformSettings,
    /// Family drawn with when a requested font cannot be loaded. Must name
    /// one of the standard faces; anything else means Helvetica.
    pub fallback_font: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            transform: TransformSettings::default(),
            fallback_font: StandardFont::Helvetica.base_font().to_string(),
        }
    }
}

impl ExportConfig {
    pub fn fallback(&self) -> StandardFont {
        FontKey::from_family(&self.fallback_font)
            .standard()
            .unwrap_or(StandardFont::Helvetica)
    }
}

/// Where TrueType faces come from besides registered font providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    /// Scan the platform's installed fonts (`system-fonts` feature).
    pub system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OverstampConfig::default();
        assert_eq!(config.upload.max_bytes, 20 * 1024 * 1024);
        assert_eq!(config.upload.accepted_media_types, vec!["application/pdf"]);
        assert_eq!(config.export.transform.baseline_ratio, 0.8);
        assert_eq!(config.export.fallback(), StandardFont::Helvetica);
        assert_eq!(config.placement.image_width, 150.0);
        assert!(config.resource_root.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = OverstampConfig::from_json(
            r#"{
                "upload": { "maxBytes": 1024 },
                "export": { "baselineRatio": 0.75, "fallbackFont": "Times New Roman" },
                "placement": { "fontSize": 20, "imageWidth": 200 },
                "resourceRoot": "/srv/www"
            }"#,
        )
        .unwrap();
        assert_eq!(config.upload.max_bytes, 1024);
        assert_eq!(config.upload.accepted_media_types, vec!["application/pdf"]);
        assert_eq!(config.export.transform.baseline_ratio, 0.75);
        assert_eq!(config.export.fallback(), StandardFont::TimesRoman);
        assert_eq!(config.placement.text.font_size, 20.0);
        assert_eq!(config.placement.image_width, 200.0);
        assert_eq!(config.placement.image_height, 75.0);
        assert_eq!(config.resource_root, Some(PathBuf::from("/srv/www")));
    }

    #[test]
    fn test_non_standard_fallback_means_helvetica() {
        let export = ExportConfig {
            fallback_font: "Inter".to_string(),
            ..ExportConfig::default()
        };
        assert_eq!(export.fallback(), StandardFont::Helvetica);
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        assert!(matches!(
            OverstampConfig::from_json("{ not json"),
            Err(OverstampError::Config(_))
        ));
    }

    #[test]
    fn test_upload_policy() {
        let policy = UploadPolicy::default();
        assert!(policy.check("application/pdf", 10).is_ok());
        assert!(policy.check("Application/PDF; name=x", 10).is_ok());
        assert_eq!(
            policy.check("image/png", 10),
            Err(UploadError::WrongMediaType {
                media_type: "image/png".to_string()
            })
        );
        assert_eq!(
            policy.check("application/pdf", DEFAULT_MAX_UPLOAD_BYTES + 1),
            Err(UploadError::TooLarge {
                size: DEFAULT_MAX_UPLOAD_BYTES + 1,
                limit: DEFAULT_MAX_UPLOAD_BYTES
            })
        );
        assert!(policy.check("application/pdf", DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }
}
