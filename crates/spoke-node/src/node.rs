//! Node behaviour contract

use crate::base::{NodeBase, NodeId};
use crate::context::EditorContext;
use crate::document::EntityRecord;
use crate::error::DeserializeError;
use crate::issue::Issue;
use crate::property::{LoadErrorCallback, LoadScheduler};
use std::any::Any;
use std::fmt::Debug;

/// Runtime behaviour of a scene node
///
/// Object safe; the scene stores nodes as `Box<dyn SceneNode>`. Variants hold
/// a [`NodeBase`] and delegate the shared steps to it explicitly.
pub trait SceneNode: Debug + Send + Sync + 'static {
    /// Shared structural data
    fn base(&self) -> &NodeBase;

    /// Shared structural data, mutable
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Component identifying this node type in documents
    fn component_name(&self) -> &'static str;

    /// Persisted record with applied (not merely requested) resource references
    fn serialize(&self) -> EntityRecord;

    /// Gather export-only data; called on export clones only
    fn prepare_for_export(&mut self) {
        self.base_mut().prepare_for_export();
    }

    /// Copy editable state and applied resources without reloading
    fn duplicate(&self) -> Box<dyn SceneNode>;

    /// Playback started
    fn on_play(&mut self) {}

    /// Per-frame tick; `dt` in seconds
    fn on_update(&mut self, _dt: f32, _playing: bool) {}

    /// Playback stopped
    fn on_pause(&mut self) {}

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Node identity
    fn id(&self) -> NodeId {
        self.base().id
    }

    /// Snapshot of current issues
    fn issues(&self) -> Vec<Issue> {
        self.base().issues()
    }
}

/// A concrete node type the registry can construct
pub trait NodeType: SceneNode + Sized {
    /// Component identifying this type in documents
    const COMPONENT_NAME: &'static str;
    /// Default display name
    const NODE_NAME: &'static str;
    /// Short description for node pickers
    const DESCRIPTION: &'static str;

    /// Create a fresh node for interactive insertion
    fn create(ctx: &EditorContext) -> Self;

    /// Build a node from its entity record
    ///
    /// Synchronous fields are applied before returning. Resource pipelines are
    /// handed to `scheduler`; `on_error` is invoked for each failure that
    /// settles authoritatively.
    ///
    /// # Errors
    /// Returns [`DeserializeError`] if the record is structurally invalid.
    fn deserialize(
        ctx: &EditorContext,
        entity: &EntityRecord,
        scheduler: &mut dyn LoadScheduler,
        on_error: Option<&LoadErrorCallback>,
    ) -> Result<Self, DeserializeError>;
}
