//! ResourceProvider trait for abstracting how annotation assets are loaded.
//!
//! Image annotations reference their bitmap by a location string: a relative
//! path such as `signatures/me.png`, an `https://` URL or an inline `data:`
//! URI. The exporter resolves those strings through a provider so it never
//! touches the filesystem or the network directly.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported resource location: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads annotation assets by location.
///
/// # Implementations
///
/// - `InMemoryResourceProvider`: pre-populated map, used by tests and embedders
/// - `FilesystemResourceProvider`: relative paths under a base directory
/// - `DataUriResourceProvider`: inline base64 `data:` URIs
/// - `HttpResourceProvider`: remote URLs (`remote` feature)
/// - `ChainedResourceProvider`: tries several providers in order
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its path/URI.
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check if a resource exists.
    fn exists(&self, path: &str) -> bool;

    /// Whether this provider understands `path` at all. A chained provider
    /// only consults providers that claim the location.
    fn handles(&self, path: &str) -> bool {
        let _ = path;
        true
    }

    /// Get the base path for resolving relative resources.
    ///
    /// Returns `None` if the provider doesn't use path-based resolution.
    fn base_path(&self) -> Option<&str> {
        None
    }

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

impl<T: ResourceProvider + ?Sized> ResourceProvider for Arc<T> {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        (**self).load(path)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn handles(&self, path: &str) -> bool {
        (**self).handles(path)
    }

    fn base_path(&self) -> Option<&str> {
        (**self).base_path()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// An in-memory resource provider.
///
/// Resources are stored in memory and must be pre-populated before use.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        self.add_shared(path, Arc::new(data))
    }

    /// Add a resource from shared data.
    pub fn add_shared(
        &self,
        path: impl Into<String>,
        data: SharedResourceData,
    ) -> Result<(), ResourceError> {
        let path_string = path.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                path: path_string.clone(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(path_string, data);
        Ok(())
    }

    /// Remove a resource from the store.
    ///
    /// Returns `None` if the lock is poisoned or the resource doesn't exist.
    pub fn remove(&self, path: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(path)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.resources.read().map(|r| r.is_empty()).unwrap_or(true)
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                path: path.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_provider_add_and_load() {
        let provider = InMemoryResourceProvider::new();
        provider.add("sig.png", b"\x89PNG".to_vec()).unwrap();

        let data = provider.load("sig.png").unwrap();
        assert_eq!(&*data, b"\x89PNG");
    }

    #[test]
    fn test_in_memory_provider_not_found() {
        let provider = InMemoryResourceProvider::new();
        let result = provider.load("missing.png");
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }

    #[test]
    fn test_in_memory_provider_exists_and_remove() {
        let provider = InMemoryResourceProvider::new();
        provider.add("a.png", vec![1]).unwrap();

        assert!(provider.exists("a.png"));
        let removed = provider.remove("a.png");
        assert_eq!(removed.as_deref(), Some(&vec![1]));
        assert!(!provider.exists("a.png"));
        assert!(provider.remove("a.png").is_none());
    }

    #[test]
    fn test_in_memory_provider_overwrite() {
        let provider = InMemoryResourceProvider::new();
        provider.add("sig.png", b"original".to_vec()).unwrap();
        provider.add("sig.png", b"updated".to_vec()).unwrap();

        assert_eq!(&*provider.load("sig.png").unwrap(), b"updated");
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_in_memory_provider_defaults() {
        let provider = InMemoryResourceProvider::new();
        assert!(provider.is_empty());
        assert!(provider.handles("anything"));
        assert!(provider.base_path().is_none());
        assert_eq!(provider.name(), "InMemoryResourceProvider");
    }

    #[test]
    fn test_arc_provider_delegates() {
        let provider = Arc::new(InMemoryResourceProvider::new());
        provider.add("x", vec![7]).unwrap();
        let as_trait: Arc<dyn ResourceProvider> = provider;
        assert!(as_trait.exists("x"));
        assert_eq!(&*as_trait.load("x").unwrap(), &[7]);
    }

    #[test]
    fn test_resource_error_display() {
        let err = ResourceError::LoadFailed {
            path: "file.bin".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("file.bin"));
        assert!(err.to_string().contains("permission denied"));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let resource_err: ResourceError = io_err.into();
        assert!(matches!(resource_err, ResourceError::Io(_)));
    }
}
