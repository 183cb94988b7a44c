//! Node type registry
//!
//! Maps component names to node constructors. An entity is claimed by the
//! first registered type whose component it carries.

use crate::context::EditorContext;
use crate::document::EntityRecord;
use crate::error::DeserializeError;
use crate::node::{NodeType, SceneNode};
use crate::nodes::{GroupNode, ImageNode, SpinningCubeNode};
use crate::property::{LoadErrorCallback, LoadScheduler};

type DeserializeFn = fn(
    &EditorContext,
    &EntityRecord,
    &mut dyn LoadScheduler,
    Option<&LoadErrorCallback>,
) -> Result<Box<dyn SceneNode>, DeserializeError>;

type CreateFn = fn(&EditorContext) -> Box<dyn SceneNode>;

/// Display metadata for a registered node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTypeInfo {
    /// Document component name
    pub component_name: &'static str,
    /// Default display name
    pub node_name: &'static str,
    /// Short description
    pub description: &'static str,
}

struct Registration {
    info: NodeTypeInfo,
    deserialize: DeserializeFn,
    create: CreateFn,
}

fn deserialize_boxed<T: NodeType>(
    ctx: &EditorContext,
    entity: &EntityRecord,
    scheduler: &mut dyn LoadScheduler,
    on_error: Option<&LoadErrorCallback>,
) -> Result<Box<dyn SceneNode>, DeserializeError> {
    let node = T::deserialize(ctx, entity, scheduler, on_error)?;
    Ok(Box::new(node))
}

fn create_boxed<T: NodeType>(ctx: &EditorContext) -> Box<dyn SceneNode> {
    Box::new(T::create(ctx))
}

/// Ordered set of node types
#[derive(Default)]
pub struct NodeRegistry {
    entries: Vec<Registration>,
}

impl NodeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in node type
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<SpinningCubeNode>();
        registry.register::<ImageNode>();
        registry.register::<GroupNode>();
        registry
    }

    /// Register a node type; re-registering a component replaces it in place
    pub fn register<T: NodeType>(&mut self) {
        let registration = Registration {
            info: NodeTypeInfo {
                component_name: T::COMPONENT_NAME,
                node_name: T::NODE_NAME,
                description: T::DESCRIPTION,
            },
            deserialize: deserialize_boxed::<T>,
            create: create_boxed::<T>,
        };

        match self
            .entries
            .iter_mut()
            .find(|e| e.info.component_name == T::COMPONENT_NAME)
        {
            Some(existing) => *existing = registration,
            None => self.entries.push(registration),
        }
    }

    /// Metadata for all registered types in registration order
    pub fn node_types(&self) -> impl Iterator<Item = NodeTypeInfo> + '_ {
        self.entries.iter().map(|e| e.info)
    }

    /// Metadata for one component
    #[must_use]
    pub fn info(&self, component_name: &str) -> Option<NodeTypeInfo> {
        self.find(component_name).map(|e| e.info)
    }

    /// Component of the first registered type present on `entity`
    #[must_use]
    pub fn component_for(&self, entity: &EntityRecord) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| entity.has_component(e.info.component_name))
            .map(|e| e.info.component_name)
    }

    /// Build a node for `entity`
    ///
    /// # Errors
    /// [`DeserializeError::UnknownNodeType`] if no registered type claims the
    /// entity, or the node type's own error.
    pub fn deserialize(
        &self,
        ctx: &EditorContext,
        entity: &EntityRecord,
        scheduler: &mut dyn LoadScheduler,
        on_error: Option<&LoadErrorCallback>,
    ) -> Result<Box<dyn SceneNode>, DeserializeError> {
        let entry = self
            .entries
            .iter()
            .find(|e| entity.has_component(e.info.component_name))
            .ok_or_else(|| DeserializeError::UnknownNodeType(entity.uuid.to_string()))?;

        (entry.deserialize)(ctx, entity, scheduler, on_error)
    }

    /// Create a fresh node of a registered type
    #[must_use]
    pub fn create(&self, component_name: &str, ctx: &EditorContext) -> Option<Box<dyn SceneNode>> {
        self.find(component_name).map(|e| (e.create)(ctx))
    }

    fn find(&self, component_name: &str) -> Option<&Registration> {
        self.entries
            .iter()
            .find(|e| e.info.component_name == component_name)
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.info.component_name))
            .finish()
    }
}
