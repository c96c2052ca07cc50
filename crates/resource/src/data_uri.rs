use base64::{Engine, engine::general_purpose::STANDARD};
use overstamp_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Serves `data:` URIs, the form an image picked in the browser arrives in.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUriResourceProvider;

impl DataUriResourceProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Decodes the payload of a `data:[<media type>][;base64],<data>` URI.
///
/// Payloads without the `;base64` marker are returned verbatim.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ResourceError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ResourceError::Unsupported(truncate(uri)))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ResourceError::InvalidFormat(format!("data URI without payload: {}", truncate(uri))))?;

    if header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        // Browsers sometimes wrap long payloads; whitespace is not significant.
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ResourceError::InvalidFormat(format!("bad base64 payload: {}", e)))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

fn truncate(uri: &str) -> String {
    uri.chars().take(48).collect()
}

impl ResourceProvider for DataUriResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        decode_data_uri(path).map(Arc::new)
    }

    fn exists(&self, path: &str) -> bool {
        decode_data_uri(path).is_ok()
    }

    fn handles(&self, path: &str) -> bool {
        path.starts_with("data:")
    }

    fn name(&self) -> &'static str {
        "DataUriResourceProvider"
    }
}
