//! Network-backed providers. Blocking; callers on an async runtime should
//! run exports on a blocking thread.

use overstamp_traits::{
    FontError, FontProvider, ResourceError, ResourceProvider, SharedFontData, SharedResourceData,
};
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, RwLock};

/// Regular weight of Inter from the Google Fonts repository.
pub const INTER_REGULAR_URL: &str =
    "https://raw.githubusercontent.com/google/fonts/main/ofl/inter/static/Inter-Regular.ttf";

const USER_AGENT: &str = concat!("overstamp/", env!("CARGO_PKG_VERSION"));

/// Upper bound on a downloaded body; fonts and signatures are far smaller.
const MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

fn fetch(url: &str) -> Result<Vec<u8>, String> {
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| e.to_string())?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| e.to_string())?;
    Ok(bytes)
}

/// Loads `http://` and `https://` locations.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpResourceProvider;

impl HttpResourceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceProvider for HttpResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        log::debug!("Fetching remote resource {}", path);
        fetch(path)
            .map(Arc::new)
            .map_err(|message| ResourceError::LoadFailed {
                path: path.to_string(),
                message,
            })
    }

    fn exists(&self, path: &str) -> bool {
        ureq::head(path)
            .set("User-Agent", USER_AGENT)
            .call()
            .is_ok()
    }

    fn handles(&self, path: &str) -> bool {
        path.starts_with("http://") || path.starts_with("https://")
    }

    fn name(&self) -> &'static str {
        "HttpResourceProvider"
    }
}

/// Downloads font programs by family from a fixed family → URL table and
/// keeps the bytes for the lifetime of the provider.
#[derive(Debug)]
pub struct RemoteFontProvider {
    urls: HashMap<String, String>,
    downloaded: RwLock<HashMap<String, SharedFontData>>,
}

impl Default for RemoteFontProvider {
    fn default() -> Self {
        Self::new().with_family("Inter", INTER_REGULAR_URL)
    }
}

impl RemoteFontProvider {
    /// An empty table; see [`Default`] for one that knows Inter.
    pub fn new() -> Self {
        Self {
            urls: HashMap::new(),
            downloaded: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_family(mut self, family: &str, url: impl Into<String>) -> Self {
        self.urls.insert(family.to_lowercase(), url.into());
        self
    }
}

impl FontProvider for RemoteFontProvider {
    fn load_font(&self, family: &str) -> Result<SharedFontData, FontError> {
        let key = family.to_lowercase();
        if let Some(data) = self.downloaded.read().ok().and_then(|d| d.get(&key).cloned()) {
            return Ok(data);
        }

        let url = self
            .urls
            .get(&key)
            .ok_or_else(|| FontError::NotFound(family.to_string()))?;
        log::info!("Downloading font '{}' from {}", family, url);

        let bytes = fetch(url).map_err(|message| FontError::LoadFailed {
            family: family.to_string(),
            message,
        })?;
        if bytes.is_empty() {
            return Err(FontError::InvalidData(family.to_string()));
        }

        let data = Arc::new(bytes);
        if let Ok(mut downloaded) = self.downloaded.write() {
            downloaded.insert(key, data.clone());
        }
        Ok(data)
    }

    fn has_font(&self, family: &str) -> bool {
        self.urls.contains_key(&family.to_lowercase())
    }

    fn list_families(&self) -> Vec<String> {
        self.downloaded
            .read()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "RemoteFontProvider"
    }
}
