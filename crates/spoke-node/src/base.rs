//! Structural node data shared by every node variant
//!
//! [`NodeBase`] carries identity, name, transform and visibility, plus the
//! live state that asynchronous loads write into. Variants embed it and
//! delegate the shared (de)serialization and export steps to it.

use crate::document::{ComponentRecord, EntityRecord};
use crate::error::DeserializeError;
use crate::issue::Issue;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use spoke_resource::Attribution;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Component record holding the transform
pub const TRANSFORM_COMPONENT: &str = "transform";

/// Component record holding visibility
pub const VISIBLE_COMPONENT: &str = "visible";

/// Export-only component carrying attribution
pub const ATTRIBUTION_COMPONENT: &str = "attribution";

/// Unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh random id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing uuid
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying uuid
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Position, rotation (radians, XYZ euler) and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Local position
    pub position: [f64; 3],
    /// Local rotation in radians
    pub rotation: [f64; 3],
    /// Local scale
    pub scale: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct VisibleProps {
    visible: bool,
}

impl Default for VisibleProps {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// State written by asynchronous resource pipelines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveState {
    /// Current diagnostics, replaced on every settled load
    pub issues: Vec<Issue>,
    /// Attribution of the most recently resolved resource
    pub attribution: Option<Attribution>,
}

/// Live state shared between a node and its in-flight pipelines
pub type SharedLiveState = Arc<Mutex<LiveState>>;

/// Fields and steps common to all scene nodes
#[derive(Debug)]
pub struct NodeBase {
    /// Node identity
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Local transform
    pub transform: Transform,
    /// Visibility
    pub visible: bool,
    live: SharedLiveState,
    export_components: Vec<ComponentRecord>,
}

impl NodeBase {
    /// Create a base with a fresh id
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            transform: Transform::default(),
            visible: true,
            live: SharedLiveState::default(),
            export_components: Vec::new(),
        }
    }

    /// Apply the shared fields of an entity record
    ///
    /// `default_name` is used when the record has no name. Missing
    /// `transform`/`visible` components fall back to defaults.
    ///
    /// # Errors
    /// Returns [`DeserializeError::InvalidProps`] if a base component is malformed.
    pub fn from_record(entity: &EntityRecord, default_name: &str) -> Result<Self, DeserializeError> {
        let transform: Transform = entity.optional_props(TRANSFORM_COMPONENT)?;
        let visible: VisibleProps = entity.optional_props(VISIBLE_COMPONENT)?;

        let name = if entity.name.is_empty() {
            default_name.to_string()
        } else {
            entity.name.clone()
        };

        Ok(Self {
            id: NodeId::from_uuid(entity.uuid),
            name,
            transform,
            visible: visible.visible,
            live: SharedLiveState::default(),
            export_components: Vec::new(),
        })
    }

    /// Build the entity record: base components first, then `components`
    ///
    /// Parent and index are left for the scene to fill in.
    #[must_use]
    pub fn to_record(&self, components: impl IntoIterator<Item = ComponentRecord>) -> EntityRecord {
        let mut records = vec![
            ComponentRecord::new(
                TRANSFORM_COMPONENT,
                serde_json::json!({
                    "position": self.transform.position,
                    "rotation": self.transform.rotation,
                    "scale": self.transform.scale,
                }),
            ),
            ComponentRecord::new(VISIBLE_COMPONENT, serde_json::json!({ "visible": self.visible })),
        ];
        records.extend(components);

        EntityRecord {
            uuid: *self.id.as_uuid(),
            name: self.name.clone(),
            parent: None,
            index: 0,
            components: records,
        }
    }

    /// Reset export data and record the shared export components
    pub fn prepare_for_export(&mut self) {
        self.export_components.clear();
        self.export_components.push(ComponentRecord::new(
            VISIBLE_COMPONENT,
            serde_json::json!({ "visible": self.visible }),
        ));

        if let Some(attribution) = self.attribution() {
            self.export_components.push(ComponentRecord::new(
                ATTRIBUTION_COMPONENT,
                serde_json::json!({
                    "title": attribution.title,
                    "author": attribution.author,
                    "url": attribution.url,
                }),
            ));
        }
    }

    /// Add an export-only component
    pub fn add_export_component(&mut self, component: ComponentRecord) {
        self.export_components.push(component);
    }

    /// Export-only components gathered by the last `prepare_for_export`
    #[inline]
    #[must_use]
    pub fn export_components(&self) -> &[ComponentRecord] {
        &self.export_components
    }

    /// Copy with a fresh id and an independent snapshot of live state
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: NodeId::new(),
            name: self.name.clone(),
            transform: self.transform,
            visible: self.visible,
            live: Arc::new(Mutex::new(self.live.lock().clone())),
            export_components: Vec::new(),
        }
    }

    /// Shared live state handle
    #[inline]
    #[must_use]
    pub fn live(&self) -> &SharedLiveState {
        &self.live
    }

    /// Snapshot of current issues
    #[must_use]
    pub fn issues(&self) -> Vec<Issue> {
        self.live.lock().issues.clone()
    }

    /// Replace the issue list
    pub fn set_issues(&self, issues: Vec<Issue>) {
        self.live.lock().issues = issues;
    }

    /// Attribution of the current resource, if any
    #[must_use]
    pub fn attribution(&self) -> Option<Attribution> {
        self.live.lock().attribution.clone()
    }
}
