//! Editor session
//!
//! Owns the scene, the node registry and the session context, and reacts to
//! the events nodes emit.

use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::export::export_scene;
use crate::loader::{LoadReport, SceneLoadTracker};
use crate::scene::{PlacedNode, Scene};
use parking_lot::Mutex;
use spoke_node::{
    EditorContext, EditorEvent, EditorSignals, EventReceiver, Issue, LoadErrorCallback, NodeId,
    NodeRegistry, ResourcePropertyError, SceneDocument,
};
use spoke_resource::{DirectoryResolver, FileFetcher, TextureCache, TextureDecoder};
use std::path::Path;
use std::sync::Arc;

/// Issues of one node, for summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIssues {
    /// Node id
    pub node: NodeId,
    /// Node display name
    pub name: String,
    /// Current issues
    pub issues: Vec<Issue>,
}

/// An editing session over one scene
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    ctx: EditorContext,
    events: EventReceiver,
    registry: NodeRegistry,
    scene: Scene,
    selection: Vec<NodeId>,
    playing: bool,
    modified: bool,
}

impl Editor {
    /// Create an editor resolving media from the configured asset root
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let resolver = Arc::new(DirectoryResolver::new(&config.asset_root));
        let textures = TextureCache::new(
            Arc::new(FileFetcher),
            TextureDecoder,
            config.cache_capacity_bytes,
        );
        let (signals, events) = EditorSignals::channel();
        let ctx = EditorContext::new(resolver, textures, signals);
        Self::with_context(config, ctx, events)
    }

    /// Create an editor over an existing context
    ///
    /// `events` must be the receiver paired with `ctx.signals`.
    #[must_use]
    pub fn with_context(config: EditorConfig, ctx: EditorContext, events: EventReceiver) -> Self {
        let ctx = ctx.with_thresholds(config.issues);
        Self {
            config,
            ctx,
            events,
            registry: NodeRegistry::with_builtin(),
            scene: Scene::new("New Scene"),
            selection: Vec::new(),
            playing: false,
            modified: false,
        }
    }

    /// Session configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Session context handed to nodes
    #[inline]
    #[must_use]
    pub fn ctx(&self) -> &EditorContext {
        &self.ctx
    }

    /// Node types available in this session
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Node types, mutable for registering extra types
    #[inline]
    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    /// Current scene
    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current scene, mutable
    ///
    /// Structural edits made here are not tracked; prefer the editor methods.
    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Check for unsaved changes
    #[inline]
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Check if playback is running
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Replace the scene with `document`, waiting for every resource load
    ///
    /// Resource failures do not fail the load; they are attached to their
    /// nodes as issues and listed in the report.
    ///
    /// If this future is dropped while loads are outstanding, the new scene
    /// stays installed and its unfinished loads are aborted. Their properties
    /// keep the requested reference and can be requested again.
    ///
    /// # Errors
    /// Structural errors (unknown node types, malformed props, broken parent
    /// links) abort the load and leave the current scene in place.
    pub async fn load_document(&mut self, document: SceneDocument) -> EditorResult<LoadReport> {
        let failures: Arc<Mutex<Vec<ResourcePropertyError>>> = Arc::default();
        let sink = Arc::clone(&failures);
        let on_error: LoadErrorCallback = Arc::new(move |_node, error: &ResourcePropertyError| {
            sink.lock().push(error.clone());
        });

        let mut tracker = SceneLoadTracker::new();
        let mut placed: Vec<PlacedNode> = Vec::with_capacity(document.entities.len());
        for entity in &document.entities {
            let node = self
                .registry
                .deserialize(&self.ctx, entity, &mut tracker, Some(&on_error))?;
            placed.push((entity.parent.map(NodeId::from_uuid), entity.index, node));
        }

        let scene = Scene::from_nodes(document.name, placed)?;
        let nodes = scene.len();
        let scheduled = tracker.scheduled();

        if self.playing {
            self.pause();
        }
        self.scene = scene;
        self.selection.clear();

        let summary = tracker.settle().await;
        let errors = std::mem::take(&mut *failures.lock());

        // settling a fresh load is not a user change
        self.drain_events();
        self.modified = false;

        tracing::info!(
            scene = self.scene.name(),
            nodes,
            scheduled,
            failed = errors.len(),
            "scene loaded"
        );

        Ok(LoadReport {
            nodes,
            scheduled,
            panicked: summary.panicked,
            errors,
        })
    }

    /// Open a scene file
    ///
    /// # Errors
    /// [`EditorError::UnsavedChanges`] if the current scene is modified and
    /// `force` is false; otherwise I/O, document or load errors.
    pub async fn open_scene(&mut self, path: &Path, force: bool) -> EditorResult<LoadReport> {
        if self.modified && !force {
            return Err(EditorError::UnsavedChanges(self.scene.name().to_string()));
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EditorError::io_error(path, e))?;
        let document = SceneDocument::from_json(&text)?;
        self.load_document(document).await
    }

    /// Persisted form of the current scene
    #[must_use]
    pub fn save_document(&self) -> SceneDocument {
        self.scene.to_document()
    }

    /// Write the scene to `path` and clear the modified flag
    ///
    /// # Errors
    /// I/O or serialization errors.
    pub async fn save_scene(&mut self, path: &Path) -> EditorResult<()> {
        let json = self.save_document().to_json_pretty()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| EditorError::io_error(path, e))?;

        self.modified = false;
        tracing::info!(scene = self.scene.name(), path = %path.display(), "scene saved");
        Ok(())
    }

    /// Export document for the current scene; the scene itself is not changed
    #[must_use]
    pub fn export_document(&self) -> SceneDocument {
        export_scene(&self.scene)
    }

    /// Insert a new node of a registered type
    ///
    /// # Errors
    /// [`EditorError::UnknownNodeType`] or [`EditorError::NodeNotFound`] for a
    /// missing parent.
    pub fn add_node(&mut self, component_name: &str, parent: Option<NodeId>) -> EditorResult<NodeId> {
        let node = self
            .registry
            .create(component_name, &self.ctx)
            .ok_or_else(|| EditorError::UnknownNodeType(component_name.to_string()))?;
        let id = self.scene.add(node, parent)?;
        self.ctx.signals.emit(EditorEvent::SceneGraphChanged);
        Ok(id)
    }

    /// Remove a node and its subtree
    ///
    /// # Errors
    /// [`EditorError::NodeNotFound`].
    pub fn remove_node(&mut self, id: NodeId) -> EditorResult<()> {
        let removed = self.scene.remove(id)?;
        let removed_ids: Vec<NodeId> = removed.iter().map(|n| n.id()).collect();

        let before = self.selection.len();
        self.selection.retain(|s| !removed_ids.contains(s));
        if self.selection.len() != before {
            self.ctx.signals.emit(EditorEvent::SelectionChanged);
        }
        self.ctx.signals.emit(EditorEvent::SceneGraphChanged);
        Ok(())
    }

    /// Duplicate a node next to the original without reloading resources
    ///
    /// # Errors
    /// [`EditorError::NodeNotFound`].
    pub fn duplicate_node(&mut self, id: NodeId, recursive: bool) -> EditorResult<NodeId> {
        let copy = self.scene.duplicate(id, recursive)?;
        self.ctx.signals.emit(EditorEvent::SceneGraphChanged);
        Ok(copy)
    }

    /// Selected nodes
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Replace the selection; unknown ids are dropped
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let mut selection: Vec<NodeId> = Vec::new();
        for id in ids {
            if self.scene.contains(id) && !selection.contains(&id) {
                selection.push(id);
            }
        }
        if selection != self.selection {
            self.selection = selection;
            self.ctx.signals.emit(EditorEvent::SelectionChanged);
        }
    }

    /// Start playback
    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.scene.for_each_mut(|node| node.on_play());
        tracing::debug!("playback started");
    }

    /// Stop playback, restoring node state saved on play
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.scene.for_each_mut(|node| node.on_pause());
        tracing::debug!("playback paused");
    }

    /// Advance every node by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let playing = self.playing;
        self.scene.for_each_mut(|node| node.on_update(dt, playing));
    }

    /// Drain pending node events, marking the scene modified when needed
    pub fn process_events(&mut self) -> Vec<EditorEvent> {
        let events = self.drain_events();
        if events.iter().any(EditorEvent::marks_modified) {
            self.modified = true;
        }
        events
    }

    /// Nodes that currently have issues, in scene order
    #[must_use]
    pub fn issues(&self) -> Vec<NodeIssues> {
        self.scene
            .iter()
            .filter_map(|node| {
                let issues = node.issues();
                (!issues.is_empty()).then(|| NodeIssues {
                    node: node.id(),
                    name: node.base().name.clone(),
                    issues,
                })
            })
            .collect()
    }

    fn drain_events(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
