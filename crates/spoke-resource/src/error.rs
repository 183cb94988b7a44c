//! Error types for the resource layer
//!
//! Provides error handling for:
//! - Resolve operations (user reference → resource identity)
//! - Fetch operations (resource identity → bytes)
//! - Decode operations (bytes → artifact)

use std::path::PathBuf;

/// Errors while mapping a user reference to an accessible identity
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Reference was empty or whitespace
    #[error("empty resource reference")]
    EmptyReference,

    /// Reference uses a scheme the resolver cannot serve
    #[error("unsupported scheme '{scheme}' in reference '{reference}'")]
    UnsupportedScheme { reference: String, scheme: String },

    /// Reference points outside the sandboxed asset root
    #[error("reference '{0}' escapes the asset root")]
    OutsideRoot(String),

    /// Referenced file does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Attribution sidecar could not be parsed
    #[error("invalid attribution for {path}: {source}")]
    Attribution {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error during resolution
    #[error("io error resolving {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Resolver-specific failure
    #[error("resolver error: {0}")]
    Other(String),
}

impl ResolveError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while fetching the bytes behind an identity
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Resource missing at fetch time
    #[error("resource not found: {0}")]
    NotFound(String),

    /// IO error during read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport-specific failure
    #[error("fetch failed: {0}")]
    Failed(String),
}

impl FetchError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while decoding fetched bytes
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Image data could not be decoded
    #[error("failed to decode image {identity}: {source}")]
    Image {
        identity: String,
        #[source]
        source: image::ImageError,
    },

    /// Decoded data is unusable
    #[error("invalid resource {identity}: {message}")]
    Invalid { identity: String, message: String },
}

/// Combined load error surfaced by the resource cache and node pipelines
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Background decode task panicked or was cancelled
    #[error("decode task failed: {0}")]
    Join(String),
}

impl LoadError {
    /// Whether a later attempt for the same identity may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Fetch(FetchError::Io { .. } | FetchError::Failed(_)) | Self::Join(_)
        )
    }
}

/// Result type alias for resource operations
pub type LoadResult<T> = Result<T, LoadError>;
