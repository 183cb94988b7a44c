//! Identity-keyed resource cache using moka
//!
//! Provides deduplicated, concurrent loading of decoded resources keyed by
//! their resolved identity.

use crate::decoder::{ResourceDecoder, TextureDecoder};
use crate::error::LoadError;
use crate::fetcher::ResourceFetcher;
use crate::identity::ResourceIdentity;
use moka::future::Cache;
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default weighted capacity (decoded bytes)
pub const DEFAULT_CAPACITY_BYTES: u64 = 256 * 1024 * 1024;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache (approximate until pending tasks run)
    pub entry_count: u64,
    /// Number of underlying fetch + decode operations started
    pub fetches: u64,
}

/// Shared cache of decoded resources
///
/// - Concurrent `get` calls for one identity share a single fetch + decode
/// - Successful results are retained for later lookups
/// - Failures are handed to every waiter but never stored
///
/// Cloning is cheap; clones share entries and statistics.
pub struct ResourceCache<D: ResourceDecoder> {
    inner: Cache<ResourceIdentity, Arc<D::Output>>,
    fetcher: Arc<dyn ResourceFetcher>,
    decoder: Arc<D>,
    fetches: Arc<AtomicU64>,
}

/// Cache of decoded textures
pub type TextureCache = ResourceCache<TextureDecoder>;

impl<D: ResourceDecoder> ResourceCache<D> {
    /// Create cache with a weighted capacity
    #[must_use]
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, decoder: D, max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .weigher(|_identity: &ResourceIdentity, artifact: &Arc<D::Output>| {
                    D::weight(artifact)
                })
                .build(),
            fetcher,
            decoder: Arc::new(decoder),
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the decoded artifact for `identity`, loading it if needed
    ///
    /// # Errors
    /// Returns the shared load error when fetching or decoding fails. The
    /// failure is not cached; a later call retries.
    pub async fn get(&self, identity: &ResourceIdentity) -> Result<Arc<D::Output>, Arc<LoadError>> {
        let fetcher = Arc::clone(&self.fetcher);
        let decoder = Arc::clone(&self.decoder);
        let fetches = Arc::clone(&self.fetches);
        let id = identity.clone();

        self.inner
            .try_get_with(identity.clone(), async move {
                fetches.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(identity = %id, "fetching resource");

                let bytes = fetcher.fetch(&id).await?;
                let decoded = tokio::task::spawn_blocking(move || decoder.decode(&id, bytes))
                    .await
                    .map_err(|e| LoadError::Join(e.to_string()))??;

                Ok::<_, LoadError>(Arc::new(decoded))
            })
            .await
    }

    /// Get artifact only if already cached
    #[inline]
    pub async fn cached(&self, identity: &ResourceIdentity) -> Option<Arc<D::Output>> {
        self.inner.get(identity).await
    }

    /// Insert an already decoded artifact
    #[inline]
    pub async fn insert(&self, identity: ResourceIdentity, artifact: Arc<D::Output>) {
        self.inner.insert(identity, artifact).await;
    }

    /// Check if cache holds `identity`
    #[inline]
    #[must_use]
    pub fn contains(&self, identity: &ResourceIdentity) -> bool {
        self.inner.contains_key(identity)
    }

    /// Invalidate cache entry
    #[inline]
    pub async fn invalidate(&self, identity: &ResourceIdentity) {
        self.inner.invalidate(identity).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Flush moka's pending maintenance so counts are exact
    #[inline]
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }
}

impl<D: ResourceDecoder> Clone for ResourceCache<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            fetcher: Arc::clone(&self.fetcher),
            decoder: Arc::clone(&self.decoder),
            fetches: Arc::clone(&self.fetches),
        }
    }
}

impl<D: ResourceDecoder> Debug for ResourceCache<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("decoder", &std::any::type_name::<D>())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
