//! Spoke Scene Nodes
//!
//! The contract every scene-graph node implements.
//!
//! # Core Operations
//!
//! - **Deserialize**: build a node from its [`EntityRecord`], applying
//!   synchronous fields at once and scheduling resource loads
//! - **Load**: [`ResourceProperty`] pipelines with last-write-wins supersession
//! - **Diagnose**: recompute [`Issue`]s after every settled load
//! - **Notify**: push [`EditorEvent`]s once a node's load settles
//! - **Serialize**: write back the applied state, plus export-only data
//!
//! # Architecture
//!
//! ```text
//! EntityRecord → NodeRegistry → NodeType::deserialize ─→ Box<dyn SceneNode>
//!                                         │
//!                                         └→ LoadTask → LoadScheduler
//!                                               │
//!             MediaResolver → TextureCache → apply → issues → EditorSignals
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use spoke_node::prelude::*;
//!
//! # async fn example(ctx: EditorContext, entity: EntityRecord) -> Result<(), DeserializeError> {
//! let registry = NodeRegistry::with_builtin();
//! let mut pending: Vec<LoadTask> = Vec::new();
//!
//! let node = registry.deserialize(&ctx, &entity, &mut pending, None)?;
//! futures::future::join_all(pending).await;
//!
//! println!("{} has {} issues", node.base().name, node.issues().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod base;
pub mod context;
pub mod detect;
pub mod document;
pub mod error;
pub mod issue;
pub mod node;
pub mod nodes;
pub mod property;
pub mod registry;
pub mod signals;

// Re-exports for convenience
pub use base::{LiveState, NodeBase, NodeId, SharedLiveState, Transform};
pub use context::EditorContext;
pub use detect::{perf_issues, texture_issues, IssueThresholds};
pub use document::{ComponentRecord, EntityRecord, SceneDocument, DOCUMENT_VERSION};
pub use error::{DeserializeError, DocumentError, ResourcePropertyError};
pub use issue::{worst_severity, Issue, Severity};
pub use node::{NodeType, SceneNode};
pub use nodes::{GroupNode, ImageNode, ImageProjection, SpinningCubeNode};
pub use property::{LoadErrorCallback, LoadScheduler, LoadTask, ResourceProperty};
pub use registry::{NodeRegistry, NodeTypeInfo};
pub use signals::{EditorEvent, EditorSignals, EventReceiver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with scene nodes
    pub use crate::base::{NodeBase, NodeId, Transform};
    pub use crate::context::EditorContext;
    pub use crate::document::{ComponentRecord, EntityRecord, SceneDocument};
    pub use crate::error::{DeserializeError, ResourcePropertyError};
    pub use crate::issue::{Issue, Severity};
    pub use crate::node::{NodeType, SceneNode};
    pub use crate::nodes::{GroupNode, ImageNode, SpinningCubeNode};
    pub use crate::property::{LoadErrorCallback, LoadScheduler, LoadTask, ResourceProperty};
    pub use crate::registry::NodeRegistry;
    pub use crate::signals::{EditorEvent, EditorSignals};
}
