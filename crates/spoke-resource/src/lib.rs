//! Spoke Resource Layer
//!
//! The boundary between scene nodes and external assets.
//!
//! # Core Operations
//!
//! - **Resolve**: map a user reference to an access-safe [`ResourceIdentity`]
//!   plus [`Attribution`]
//! - **Fetch**: read the bytes behind an identity
//! - **Decode**: turn bytes into a shared artifact (e.g. [`TextureArtifact`])
//! - **Cache**: deduplicate concurrent loads of one identity
//!
//! # Architecture
//!
//! ```text
//! reference → MediaResolver → ResourceIdentity → ResourceCache ─┬→ Arc<Artifact>
//!                                                   (miss) ↓    │
//!                                     ResourceFetcher → ResourceDecoder
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use spoke_resource::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = DirectoryResolver::new("assets");
//! let cache = TextureCache::new(Arc::new(FileFetcher), TextureDecoder, DEFAULT_CAPACITY_BYTES);
//!
//! let media = resolver.resolve("textures/wall.png").await?;
//! let texture = cache.get(&media.identity).await?;
//! println!("{}x{}", texture.width, texture.height);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod decoder;
pub mod error;
pub mod fetcher;
pub mod identity;
pub mod resolver;

// Re-exports for convenience
pub use cache::{CacheStats, ResourceCache, TextureCache, DEFAULT_CAPACITY_BYTES};
pub use decoder::{ResourceDecoder, TextureArtifact, TextureDecoder};
pub use error::{DecodeError, FetchError, LoadError, LoadResult, ResolveError};
pub use fetcher::{FileFetcher, ResourceFetcher};
pub use identity::{Attribution, ResolvedMedia, ResourceIdentity};
pub use resolver::{DirectoryResolver, MediaResolver, ATTRIBUTION_SUFFIX};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the resource layer
    pub use crate::cache::{ResourceCache, TextureCache, DEFAULT_CAPACITY_BYTES};
    pub use crate::decoder::{ResourceDecoder, TextureArtifact, TextureDecoder};
    pub use crate::error::{LoadError, ResolveError};
    pub use crate::fetcher::{FileFetcher, ResourceFetcher};
    pub use crate::identity::{Attribution, ResolvedMedia, ResourceIdentity};
    pub use crate::resolver::{DirectoryResolver, MediaResolver};
    pub use std::sync::Arc;
}
