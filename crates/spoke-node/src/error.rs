//! Error types for scene nodes
//!
//! Provides error handling for:
//! - Resource property loads (wrapped with node/property context)
//! - Entity deserialization
//! - Scene document parsing

use crate::base::NodeId;
use spoke_resource::LoadError;
use std::sync::Arc;

/// A resource load failure wrapped with the node and property it belongs to
///
/// The original cause stays reachable through [`std::error::Error::source`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to load {property} '{reference}' for node {node}")]
pub struct ResourcePropertyError {
    /// Owning node
    pub node: NodeId,
    /// Property name (e.g. `src`)
    pub property: &'static str,
    /// Reference the load was requested for
    pub reference: String,
    /// Underlying failure, shared with other waiters on the same identity
    #[source]
    pub source: Arc<LoadError>,
}

impl ResourcePropertyError {
    /// Underlying load error
    #[inline]
    #[must_use]
    pub fn load_error(&self) -> &LoadError {
        &self.source
    }
}

/// Errors while turning an entity record into a node
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    /// Required component record missing from entity
    #[error("entity {entity} has no '{component}' component")]
    MissingComponent {
        entity: String,
        component: &'static str,
    },

    /// Component props have the wrong shape
    #[error("invalid props for '{component}' on entity {entity}: {source}")]
    InvalidProps {
        entity: String,
        component: String,
        #[source]
        source: serde_json::Error,
    },

    /// No registered node type claims the entity
    #[error("no node type found for entity {0}")]
    UnknownNodeType(String),
}

/// Errors while reading or writing a scene document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Malformed JSON
    #[error("invalid scene document: {0}")]
    Json(#[from] serde_json::Error),

    /// Document version this build cannot read
    #[error("unsupported scene document version {found} (max {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
