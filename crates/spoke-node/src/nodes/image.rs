use crate::base::NodeBase;
use crate::context::EditorContext;
use crate::document::{ComponentRecord, EntityRecord};
use crate::error::DeserializeError;
use crate::node::{NodeType, SceneNode};
use crate::property::{LoadErrorCallback, LoadScheduler, ResourceProperty};
use serde::{Deserialize, Serialize};
use spoke_resource::TextureArtifact;
use std::any::Any;
use std::sync::Arc;

/// Export-only mesh descriptor component
const IMAGE_MESH_COMPONENT: &str = "image-mesh";

/// How the texture is mapped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageProjection {
    /// Plane sized by the texture aspect ratio
    #[default]
    #[serde(rename = "flat")]
    Flat,
    /// Inside of a sphere
    #[serde(rename = "360-equirectangular")]
    Equirectangular360,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageProps {
    src: String,
    projection: ImageProjection,
}

/// A textured plane or panorama
#[derive(Debug)]
pub struct ImageNode {
    base: NodeBase,
    src: ResourceProperty,
    /// Texture mapping
    pub projection: ImageProjection,
}

impl ImageNode {
    /// Property name of the texture reference
    pub const SRC: &'static str = "src";

    fn with_base(base: NodeBase) -> Self {
        let src = ResourceProperty::new(Self::SRC, base.id, Arc::clone(base.live()));
        Self {
            base,
            src,
            projection: ImageProjection::default(),
        }
    }

    /// Requested texture reference
    #[must_use]
    pub fn src(&self) -> String {
        self.src.get()
    }

    /// Request a new texture; loads in the background
    pub fn set_src(&self, ctx: &EditorContext, src: impl Into<String>) {
        self.src.set_requested(ctx, src);
    }

    /// The texture property
    #[inline]
    #[must_use]
    pub fn src_property(&self) -> &ResourceProperty {
        &self.src
    }

    /// Applied texture
    #[must_use]
    pub fn texture(&self) -> Option<Arc<TextureArtifact>> {
        self.src.artifact()
    }

    /// Mesh height/width ratio from the applied texture, 1.0 without one
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.texture().map_or(1.0, |t| t.aspect_ratio())
    }
}

impl SceneNode for ImageNode {
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
            serde_json::json!({
                "src": self.src.applied(),
                "projection": self.projection,
            }),
        )])
    }

    fn prepare_for_export(&mut self) {
        self.base.prepare_for_export();

        let Some(texture) = self.texture() else {
            return;
        };
        let geometry = match self.projection {
            ImageProjection::Flat => "plane",
            ImageProjection::Equirectangular360 => "sphere",
        };
        self.base.add_export_component(ComponentRecord::new(
            IMAGE_MESH_COMPONENT,
            serde_json::json!({
                "geometry": geometry,
                "aspect": texture.aspect_ratio(),
                "width": texture.width,
                "height": texture.height,
                "texture": texture.identity.as_str(),
            }),
        ));
    }

    fn duplicate(&self) -> Box<dyn SceneNode> {
        let base = self.base.duplicate();
        let src = self.src.duplicate_for(base.id, Arc::clone(base.live()));
        Box::new(Self {
            base,
            src,
            projection: self.projection,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl NodeType for ImageNode {
    const COMPONENT_NAME: &'static str = "image";
    const NODE_NAME: &'static str = "Image";
    const DESCRIPTION: &'static str = "Dynamically loads an image.";

    fn create(_ctx: &EditorContext) -> Self {
        Self::with_base(NodeBase::new(Self::NODE_NAME))
    }

    fn deserialize(
        ctx: &EditorContext,
        entity: &EntityRecord,
        scheduler: &mut dyn LoadScheduler,
        on_error: Option<&LoadErrorCallback>,
    ) -> Result<Self, DeserializeError> {
        let base = NodeBase::from_record(entity, Self::NODE_NAME)?;
        let props: ImageProps = entity.props(Self::COMPONENT_NAME)?;

        let mut node = Self::with_base(base);
        node.projection = props.projection;

        if let Some(task) = node.src.request(ctx, props.src, on_error.cloned()) {
            scheduler.schedule(task);
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_names() {
        assert_eq!(
            serde_json::to_value(ImageProjection::Equirectangular360).unwrap(),
            "360-equirectangular"
        );
        let flat: ImageProjection = serde_json::from_value(serde_json::json!("flat")).unwrap();
        assert_eq!(flat, ImageProjection::Flat);
    }

    #[test]
    fn unloaded_image_serializes_empty_src() {
        let node = ImageNode::with_base(NodeBase::new("Image"));
        let record = node.serialize();
        let own = record.component(ImageNode::COMPONENT_NAME).unwrap();
        assert_eq!(own.props, serde_json::json!({ "src": "", "projection": "flat" }));
        assert_eq!(node.aspect_ratio(), 1.0);
    }

    #[test]
    fn export_without_texture_has_no_mesh() {
        let mut node = ImageNode::with_base(NodeBase::new("Image"));
        node.prepare_for_export();
        assert!(node
            .base()
            .export_components()
            .iter()
            .all(|c| c.name != IMAGE_MESH_COMPONENT));
    }
}
