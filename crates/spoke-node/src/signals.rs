//! Change notification
//!
//! Nodes push coarse events into an unbounded channel; the host editor drains
//! it to mark the scene dirty and refresh the properties panel.

use crate::base::NodeId;
use tokio::sync::mpsc;

/// Event emitted to the host editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Data of the listed nodes changed
    ObjectsChanged {
        /// Affected nodes
        nodes: Vec<NodeId>,
        /// Property that changed, if known
        property: Option<String>,
    },
    /// Properties shown for the current selection may be stale
    SelectionChanged,
    /// Nodes were added, removed or re-parented
    SceneGraphChanged,
}

impl EditorEvent {
    /// Objects-changed event for one node
    #[inline]
    #[must_use]
    pub fn object_changed(node: NodeId, property: impl Into<String>) -> Self {
        Self::ObjectsChanged {
            nodes: vec![node],
            property: Some(property.into()),
        }
    }

    /// Whether the event means unsaved changes
    #[inline]
    #[must_use]
    pub fn marks_modified(&self) -> bool {
        matches!(self, Self::ObjectsChanged { .. } | Self::SceneGraphChanged)
    }
}

/// Receiving half held by the editor
pub type EventReceiver = mpsc::UnboundedReceiver<EditorEvent>;

/// Sending half shared with every node
#[derive(Debug, Clone)]
pub struct EditorSignals {
    sender: mpsc::UnboundedSender<EditorEvent>,
}

impl EditorSignals {
    /// Create a connected signals/receiver pair
    #[must_use]
    pub fn channel() -> (Self, EventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Emit an event; dropped silently once the editor is gone
    pub fn emit(&self, event: EditorEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("editor event dropped, receiver closed");
        }
    }

    /// Emit the pair of notifications for a settled node change
    pub fn node_settled(&self, node: NodeId, property: &str) {
        self.emit(EditorEvent::object_changed(node, property));
        self.emit(EditorEvent::SelectionChanged);
    }
}
