//! Export artifact production
//!
//! Export works on duplicates: `prepare_for_export` never touches the nodes
//! the user is editing. The resulting document carries each node's saved
//! components; export components replace saved ones of the same name and are
//! appended otherwise.

use crate::scene::Scene;
use spoke_node::{SceneDocument, SceneNode};

/// Build the export document for a scene
#[must_use]
pub fn export_scene(scene: &Scene) -> SceneDocument {
    let mut document = SceneDocument::new(scene.name());
    document.entities = scene.records(export_record);
    document
}

fn export_record(node: &dyn SceneNode) -> spoke_node::EntityRecord {
    let mut copy = node.duplicate();
    copy.prepare_for_export();

    let mut record = copy.serialize();
    // keep hierarchy references pointing at the original ids
    record.uuid = *node.id().as_uuid();
    for component in copy.base().export_components() {
        match record.components.iter_mut().find(|c| c.name == component.name) {
            Some(existing) => existing.clone_from(component),
            None => record.components.push(component.clone()),
        }
    }
    record
}
