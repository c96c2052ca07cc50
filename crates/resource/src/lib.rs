//! Resource providers for overstamp.
//!
//! This crate provides platform-specific implementations of the
//! `ResourceProvider` and `FontProvider` traits from overstamp-traits.
//!
//! ## Available Providers
//!
//! - [`FilesystemResourceProvider`]: relative paths under a base directory
//! - [`DataUriResourceProvider`]: inline base64 `data:` URIs
//! - [`ChainedResourceProvider`]: routes a location to the first provider that handles it
//! - [`HttpResourceProvider`] and [`RemoteFontProvider`]: network fetches (`remote` feature)

mod chained;
mod data_uri;
mod filesystem;
#[cfg(feature = "remote")]
mod http;

pub use chained::ChainedResourceProvider;
pub use data_uri::{DataUriResourceProvider, decode_data_uri};
pub use filesystem::FilesystemResourceProvider;
#[cfg(feature = "remote")]
pub use http::{HttpResourceProvider, INTER_REGULAR_URL, RemoteFontProvider};

// Re-export the in-memory providers for convenience
pub use overstamp_traits::{InMemoryFontProvider, InMemoryResourceProvider};
