//! Byte transport behind resolved identities

use crate::error::FetchError;
use crate::identity::ResourceIdentity;
use async_trait::async_trait;
use std::io::ErrorKind;

/// Fetches the raw bytes of a resolved resource
#[async_trait]
pub trait ResourceFetcher: Send + Sync + 'static {
    /// Fetch all bytes for `identity`
    async fn fetch(&self, identity: &ResourceIdentity) -> Result<Vec<u8>, FetchError>;
}

/// Fetcher reading identities as local file paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl ResourceFetcher for FileFetcher {
    async fn fetch(&self, identity: &ResourceIdentity) -> Result<Vec<u8>, FetchError> {
        match tokio::fs::read(identity.as_str()).await {
            Ok(bytes) => {
                tracing::trace!(%identity, bytes = bytes.len(), "fetched resource");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FetchError::NotFound(identity.to_string()))
            }
            Err(e) => Err(FetchError::io_error(identity.as_str(), e)),
        }
    }
}
