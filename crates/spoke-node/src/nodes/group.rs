use crate::base::NodeBase;
use crate::context::EditorContext;
use crate::document::{ComponentRecord, EntityRecord};
use crate::error::DeserializeError;
use crate::node::{NodeType, SceneNode};
use crate::property::{LoadErrorCallback, LoadScheduler};
use std::any::Any;

/// An empty node used to organise children
#[derive(Debug)]
pub struct GroupNode {
    base: NodeBase,
}

impl SceneNode for GroupNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn component_name(&self) -> &'static str {
        Self::COMPONENT_NAME
    }

    fn serialize(&self) -> EntityRecord {
        self.base.to_record([ComponentRecord::new(
            Self::COMPONENT_NAME,
            serde_json::json!({}),
        )])
    }

    fn duplicate(&self) -> Box<dyn SceneNode> {
        Box::new(Self {
            base: self.base.duplicate(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl NodeType for GroupNode {
    const COMPONENT_NAME: &'static str = "group";
    const NODE_NAME: &'static str = "Group";
    const DESCRIPTION: &'static str = "A group of multiple objects that can be moved or duplicated together.";

    fn create(_ctx: &EditorContext) -> Self {
        Self {
            base: NodeBase::new(Self::NODE_NAME),
        }
    }

    fn deserialize(
        _ctx: &EditorContext,
        entity: &EntityRecord,
        _scheduler: &mut dyn LoadScheduler,
        _on_error: Option<&LoadErrorCallback>,
    ) -> Result<Self, DeserializeError> {
        Ok(Self {
            base: NodeBase::from_record(entity, Self::NODE_NAME)?,
        })
    }
}
