use crate::base::NodeBase;
use crate::context::EditorContext;
use crate::document::{ComponentRecord, EntityRecord};
use crate::error::DeserializeError;
use crate::node::{NodeType, SceneNode};
use crate::property::{LoadErrorCallback, LoadScheduler};
use serde::Deserialize;
use std::any::Any;

/// Default spin speed in degrees per second
pub const DEFAULT_SPEED: f64 = 10.0;

/// Export-only behaviour descriptor component
const SPIN_COMPONENT: &str = "spin";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SpinningCubeProps {
    speed: f64,
}

impl Default for SpinningCubeProps {
    fn default() -> Self {
        Self { speed: DEFAULT_SPEED }
    }
}

/// A cube that spins about its Y axis while the editor is playing
#[derive(Debug)]
pub struct SpinningCubeNode {
    base: NodeBase,
    /// Degrees per second
    pub speed: f64,
    saved_rotation: Option<[f64; 3]>,
}

impl SpinningCubeNode {
    /// Rotation saved when playback started
    #[inline]
    #[must_use]
    pub fn saved_rotation(&self) -> Option<[f64; 3]> {
        self.saved_rotation
    }
}

impl SceneNode for SpinningCubeNode {
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
            serde_json::json!({ "speed": self.speed }),
        )])
    }

    fn prepare_for_export(&mut self) {
        self.base.prepare_for_export();
        self.base.add_export_component(ComponentRecord::new(
            SPIN_COMPONENT,
            serde_json::json!({
                "axis": [0.0, 1.0, 0.0],
                "radiansPerSecond": self.speed.to_radians(),
            }),
        ));
    }

    fn duplicate(&self) -> Box<dyn SceneNode> {
        Box::new(Self {
            base: self.base.duplicate(),
            speed: self.speed,
            saved_rotation: None,
        })
    }

    fn on_play(&mut self) {
        self.saved_rotation = Some(self.base.transform.rotation);
    }

    fn on_update(&mut self, dt: f32, playing: bool) {
        if playing {
            self.base.transform.rotation[1] += f64::from(dt) * self.speed.to_radians();
        }
    }

    fn on_pause(&mut self) {
        if let Some(rotation) = self.saved_rotation.take() {
            self.base.transform.rotation = rotation;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl NodeType for SpinningCubeNode {
    const COMPONENT_NAME: &'static str = "spinning-cube";
    const NODE_NAME: &'static str = "Spinning Cube";
    const DESCRIPTION: &'static str = "It's a cube! And it spins!";

    fn create(_ctx: &EditorContext) -> Self {
        Self {
            base: NodeBase::new(Self::NODE_NAME),
            speed: DEFAULT_SPEED,
            saved_rotation: None,
        }
    }

    fn deserialize(
        _ctx: &EditorContext,
        entity: &EntityRecord,
        _scheduler: &mut dyn LoadScheduler,
        _on_error: Option<&LoadErrorCallback>,
    ) -> Result<Self, DeserializeError> {
        let base = NodeBase::from_record(entity, Self::NODE_NAME)?;
        let props: SpinningCubeProps = entity.props(Self::COMPONENT_NAME)?;

        Ok(Self {
            base,
            speed: props.speed,
            saved_rotation: None,
        })
    }
}
