//! Error types for the editor
//!
//! Provides error handling for:
//! - Scene file I/O
//! - Configuration loading
//! - Document and node deserialization
//! - Scene graph edits

use spoke_node::{DeserializeError, DocumentError, NodeId};
use std::path::PathBuf;

/// Main editor error type
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed configuration file
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Malformed scene document
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Entity could not be turned into a node
    #[error(transparent)]
    Deserialize(#[from] DeserializeError),

    /// Opening another scene would discard unsaved changes
    #[error("scene '{0}' has unsaved changes")]
    UnsavedChanges(String),

    /// No node with this id in the scene
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Unknown node type requested for insertion
    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    /// Inconsistent parent links
    #[error("invalid scene graph: {0}")]
    Graph(String),
}

impl EditorError {
    /// Create I/O error
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the session can continue unchanged after this error
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::UnsavedChanges(_) | Self::NodeNotFound(_) | Self::UnknownNodeType(_)
        )
    }
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsaved_changes_is_recoverable() {
        let err = EditorError::UnsavedChanges("Crater".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "scene 'Crater' has unsaved changes");
    }

    #[test]
    fn graph_error_is_not_recoverable() {
        assert!(!EditorError::Graph("cycle".to_string()).is_recoverable());
    }
}
