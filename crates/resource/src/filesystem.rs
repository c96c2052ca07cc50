//! Filesystem-based resource provider.
//!
//! Locations are resolved against a base directory the way a static web root
//! resolves them: `signatures/me.png` and `/signatures/me.png` name the same
//! file. Resolved paths never leave the base directory.

use overstamp_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Loads image assets from a directory on the local filesystem.
///
/// Paths containing `..` or resolving (through symlinks) outside the base
/// directory are reported as `NotFound`.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves a location below the base path, or `None` if it would escape.
    fn resolve_path_safe(&self, location: &str) -> Option<PathBuf> {
        let relative = location.trim_start_matches(['/', '\\']);
        if relative.is_empty() {
            return None;
        }

        let relative_path = Path::new(relative);
        for component in relative_path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                // "..", drive prefixes and anything else that is not a plain name
                _ => return None,
            }
        }

        let full_path = self.base_path.join(relative_path);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            // A symlink inside the base may still point outside of it.
            return canonical.starts_with(base).then_some(canonical);
        }

        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve_path_safe(path)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (outside resource root)", path)))?;

        log::debug!("Loading resource '{}' from {}", path, full_path.display());

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve_path_safe(path)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn handles(&self, path: &str) -> bool {
        !(path.starts_with("data:") || path.starts_with("http://") || path.starts_with("https://"))
    }

    fn base_path(&self) -> Option<&str> {
        self.base_path.to_str()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
