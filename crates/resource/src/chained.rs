use overstamp_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Tries each registered provider that [`handles`](ResourceProvider::handles)
/// a location, in registration order. The first success wins; if every
/// candidate fails the last error is returned.
#[derive(Debug, Default, Clone)]
pub struct ChainedResourceProvider {
    providers: Vec<Arc<dyn ResourceProvider>>,
}

impl ChainedResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn push(&mut self, provider: Arc<dyn ResourceProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ResourceProvider for ChainedResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let mut last_error = None;
        for provider in self.providers.iter().filter(|p| p.handles(path)) {
            match provider.load(path) {
                Ok(data) => return Ok(data),
                Err(e) => {
                    log::debug!("{} could not load '{}': {}", provider.name(), path, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ResourceError::Unsupported(path.chars().take(48).collect())))
    }

    fn exists(&self, path: &str) -> bool {
        self.providers
            .iter()
            .any(|p| p.handles(path) && p.exists(path))
    }

    fn handles(&self, path: &str) -> bool {
        self.providers.iter().any(|p| p.handles(path))
    }

    fn name(&self) -> &'static str {
        "ChainedResourceProvider"
    }
}
