//! Scene graph
//!
//! An arena of boxed nodes keyed by [`NodeId`] with ordered child lists.
//! Parent links live here, not on the nodes.

use crate::error::{EditorError, EditorResult};
use spoke_node::{EntityRecord, NodeId, SceneDocument, SceneNode};
use std::collections::HashMap;

#[derive(Debug)]
struct Entry {
    node: Box<dyn SceneNode>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A node placed in the graph: parent, sibling index and the node itself
pub type PlacedNode = (Option<NodeId>, usize, Box<dyn SceneNode>);

/// The scene graph
#[derive(Debug, Default)]
pub struct Scene {
    name: String,
    nodes: HashMap<NodeId, Entry>,
    roots: Vec<NodeId>,
}

impl Scene {
    /// Create an empty scene
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a scene from deserialized nodes
    ///
    /// Siblings are ordered by index, ties keep input order. Nodes whose
    /// parent is absent become roots.
    ///
    /// # Errors
    /// [`EditorError::Graph`] on duplicate ids or parent cycles.
    pub fn from_nodes(name: impl Into<String>, placed: Vec<PlacedNode>) -> EditorResult<Self> {
        let mut scene = Self::new(name);
        let mut order = Vec::with_capacity(placed.len());

        for (position, (parent, index, node)) in placed.into_iter().enumerate() {
            let id = node.id();
            if scene.nodes.contains_key(&id) {
                return Err(EditorError::Graph(format!("duplicate node id {id}")));
            }
            order.push((parent, index, position, id));
            scene.nodes.insert(
                id,
                Entry {
                    node,
                    parent,
                    children: Vec::new(),
                },
            );
        }

        order.sort_by_key(|&(_, index, position, _)| (index, position));
        for (parent, _, _, id) in order {
            let parent = parent.filter(|p| {
                let known = scene.nodes.contains_key(p);
                if !known {
                    tracing::warn!(node = %id, parent = %p, "parent missing, attaching to root");
                }
                known
            });

            match parent {
                Some(parent) => {
                    if let Some(entry) = scene.nodes.get_mut(&parent) {
                        entry.children.push(id);
                    }
                }
                None => {
                    if let Some(entry) = scene.nodes.get_mut(&id) {
                        entry.parent = None;
                    }
                    scene.roots.push(id);
                }
            }
        }

        let reachable = scene.ids().len();
        if reachable != scene.nodes.len() {
            return Err(EditorError::Graph(format!(
                "{} nodes are part of a parent cycle",
                scene.nodes.len() - reachable
            )));
        }

        Ok(scene)
    }

    /// Scene name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the scene
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the scene has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check for a node
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Top-level nodes in order
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Children of a node in order
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    /// Parent of a node
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|e| e.parent)
    }

    /// Get a node
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&dyn SceneNode> {
        self.nodes.get(&id).map(|e| e.node.as_ref())
    }

    /// Get a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut (dyn SceneNode + 'static)> {
        self.nodes.get_mut(&id).map(|e| e.node.as_mut())
    }

    /// Add a node as the last child of `parent` (or as a root)
    ///
    /// # Errors
    /// [`EditorError::NodeNotFound`] if `parent` is not in the scene,
    /// [`EditorError::Graph`] if the node is already present.
    pub fn add(&mut self, node: Box<dyn SceneNode>, parent: Option<NodeId>) -> EditorResult<NodeId> {
        let len = parent.map_or(self.roots.len(), |p| self.children(p).len());
        self.insert(node, parent, len)
    }

    /// Insert a node at `index` among its siblings
    ///
    /// # Errors
    /// As [`add`](Self::add).
    pub fn insert(
        &mut self,
        node: Box<dyn SceneNode>,
        parent: Option<NodeId>,
        index: usize,
    ) -> EditorResult<NodeId> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(EditorError::Graph(format!("duplicate node id {id}")));
        }

        let siblings = match parent {
            Some(p) => &mut self
                .nodes
                .get_mut(&p)
                .ok_or(EditorError::NodeNotFound(p))?
                .children,
            None => &mut self.roots,
        };
        let index = index.min(siblings.len());
        siblings.insert(index, id);

        self.nodes.insert(
            id,
            Entry {
                node,
                parent,
                children: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Remove a node and its subtree, returning the removed nodes
    ///
    /// # Errors
    /// [`EditorError::NodeNotFound`] if `id` is not in the scene.
    pub fn remove(&mut self, id: NodeId) -> EditorResult<Vec<Box<dyn SceneNode>>> {
        let parent = self
            .nodes
            .get(&id)
            .ok_or(EditorError::NodeNotFound(id))?
            .parent;

        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(entry) => entry.children.retain(|c| *c != id),
            None => self.roots.retain(|c| *c != id),
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.nodes.remove(&current) {
                stack.extend(entry.children.iter().rev().copied());
                removed.push(entry.node);
            }
        }
        Ok(removed)
    }

    /// Duplicate a node next to the original
    ///
    /// Resources already applied on the source are shared, not reloaded.
    /// With `recursive`, the subtree is copied too.
    ///
    /// # Errors
    /// [`EditorError::NodeNotFound`] if `id` is not in the scene.
    pub fn duplicate(&mut self, id: NodeId, recursive: bool) -> EditorResult<NodeId> {
        let parent = self.parent(id);
        let siblings = parent.map_or(self.roots.as_slice(), |p| self.children(p));
        let index = siblings
            .iter()
            .position(|c| *c == id)
            .ok_or(EditorError::NodeNotFound(id))?;

        let copy = self.copy_subtree(id, recursive)?;
        self.attach_copy(copy, parent, index + 1)
    }

    /// Depth-first node order
    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            ids.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        ids
    }

    /// Nodes in depth-first order
    pub fn iter(&self) -> impl Iterator<Item = &dyn SceneNode> + '_ {
        self.ids().into_iter().filter_map(move |id| self.get(id))
    }

    /// Apply `f` to every node
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut (dyn SceneNode + 'static))) {
        for entry in self.nodes.values_mut() {
            f(entry.node.as_mut());
        }
    }

    /// Build entity records in depth-first order with parent and index set
    pub fn records(&self, mut record: impl FnMut(&dyn SceneNode) -> EntityRecord) -> Vec<EntityRecord> {
        self.ids()
            .into_iter()
            .filter_map(|id| {
                let node = self.get(id)?;
                let parent = self.parent(id);
                let siblings = parent.map_or(self.roots.as_slice(), |p| self.children(p));
                let index = siblings.iter().position(|c| *c == id).unwrap_or(0);

                let mut entity = record(node);
                entity.parent = parent.map(|p| *p.as_uuid());
                entity.index = index;
                Some(entity)
            })
            .collect()
    }

    /// Persisted form of the scene
    #[must_use]
    pub fn to_document(&self) -> SceneDocument {
        let mut document = SceneDocument::new(self.name.clone());
        document.entities = self.records(|node| node.serialize());
        document
    }

    fn copy_subtree(&self, id: NodeId, recursive: bool) -> EditorResult<CopiedNode> {
        let entry = self.nodes.get(&id).ok_or(EditorError::NodeNotFound(id))?;
        let children = if recursive {
            entry
                .children
                .iter()
                .map(|child| self.copy_subtree(*child, true))
                .collect::<EditorResult<Vec<_>>>()?
        } else {
            Vec::new()
        };
        Ok(CopiedNode {
            node: entry.node.duplicate(),
            children,
        })
    }

    fn attach_copy(&mut self, copy: CopiedNode, parent: Option<NodeId>, index: usize) -> EditorResult<NodeId> {
        let id = self.insert(copy.node, parent, index)?;
        for (position, child) in copy.children.into_iter().enumerate() {
            self.attach_copy(child, Some(id), position)?;
        }
        Ok(id)
    }
}

struct CopiedNode {
    node: Box<dyn SceneNode>,
    children: Vec<CopiedNode>,
}
