//! Editor configuration

use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use spoke_node::IssueThresholds;
use spoke_resource::DEFAULT_CAPACITY_BYTES;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Editor session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory media references are resolved against
    pub asset_root: PathBuf,
    /// Weighted texture cache capacity in decoded bytes
    pub cache_capacity_bytes: u64,
    /// Issue detector thresholds
    pub issues: IssueThresholds,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            cache_capacity_bytes: DEFAULT_CAPACITY_BYTES,
            issues: IssueThresholds::default(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With asset root
    #[inline]
    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity_bytes = bytes;
        self
    }

    /// With issue thresholds
    #[inline]
    #[must_use]
    pub fn with_issue_thresholds(mut self, thresholds: IssueThresholds) -> Self {
        self.issues = thresholds;
        self
    }

    /// With log level
    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Parse TOML; `origin` is only used for error messages
    ///
    /// # Errors
    /// Returns [`EditorError::Config`] on malformed input.
    pub fn from_toml_str(text: &str, origin: &Path) -> EditorResult<Self> {
        toml::from_str(text).map_err(|source| EditorError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from a TOML file; a missing file yields defaults
    ///
    /// # Errors
    /// Returns [`EditorError::Io`] if the file exists but cannot be read and
    /// [`EditorError::Config`] if it is malformed.
    pub fn load(path: &Path) -> EditorResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text, path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(EditorError::io_error(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
            asset_root = "assets"

            [issues]
            max_texture_dimension = 1024
            "#,
            Path::new("spoke.toml"),
        )
        .unwrap();

        assert_eq!(config.asset_root, PathBuf::from("assets"));
        assert_eq!(config.issues.max_texture_dimension, 1024);
        assert_eq!(config.issues.max_file_bytes, 8 * 1024 * 1024);
        assert_eq!(config.cache_capacity_bytes, DEFAULT_CAPACITY_BYTES);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = EditorConfig::from_toml_str("cache_capacity_bytes = \"lots\"", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, EditorError::Config { .. }));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn builders() {
        let config = EditorConfig::new()
            .with_asset_root("media")
            .with_cache_capacity(1024)
            .with_log_level("debug");
        assert_eq!(config.asset_root, PathBuf::from("media"));
        assert_eq!(config.cache_capacity_bytes, 1024);
        assert_eq!(config.log_level, "debug");
    }
}
