//! Testing utilities for the Spoke workspace
//!
//! Shared fakes, fixtures, and helpers.

#![allow(missing_docs)]

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;
use spoke_node::{
    ComponentRecord, EditorContext, EditorEvent, EditorSignals, EntityRecord, EventReceiver,
    SceneDocument,
};
use spoke_resource::{
    Attribution, FetchError, MediaResolver, ResolveError, ResolvedMedia, ResourceFetcher,
    ResourceIdentity, TextureCache, TextureDecoder, DEFAULT_CAPACITY_BYTES,
};
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Encode a blank `width`x`height` PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image::RgbaImage::new(width, height)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

/// Resolver backed by a map
///
/// Unknown references resolve to an identity equal to the reference.
#[derive(Debug, Default)]
pub struct StaticResolver {
    identities: DashMap<String, String>,
    attributions: DashMap<String, Attribution>,
    failing: DashMap<String, ()>,
    resolves: DashMap<String, usize>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `reference` to a different identity
    pub fn map(&self, reference: &str, identity: &str) {
        self.identities.insert(reference.to_string(), identity.to_string());
    }

    pub fn set_attribution(&self, reference: &str, attribution: Attribution) {
        self.attributions.insert(reference.to_string(), attribution);
    }

    /// Make every resolve of `reference` fail
    pub fn fail(&self, reference: &str) {
        self.failing.insert(reference.to_string(), ());
    }

    pub fn resolve_count(&self, reference: &str) -> usize {
        self.resolves.get(reference).map_or(0, |c| *c)
    }
}

#[async_trait]
impl MediaResolver for StaticResolver {
    async fn resolve(&self, reference: &str) -> Result<ResolvedMedia, ResolveError> {
        *self.resolves.entry(reference.to_string()).or_insert(0) += 1;

        if self.failing.contains_key(reference) {
            return Err(ResolveError::NotFound(reference.to_string()));
        }

        let identity = self
            .identities
            .get(reference)
            .map_or_else(|| reference.to_string(), |i| i.clone());
        let mut media = ResolvedMedia::new(identity);
        if let Some(attribution) = self.attributions.get(reference) {
            media = media.with_attribution(attribution.clone());
        }
        Ok(media)
    }
}

/// In-memory fetcher with per-identity gates
///
/// A held identity blocks its fetches until released, letting tests decide
/// completion order.
#[derive(Debug, Default)]
pub struct GatedFetcher {
    contents: DashMap<ResourceIdentity, Vec<u8>>,
    gates: DashMap<ResourceIdentity, Arc<Semaphore>>,
    fetches: DashMap<ResourceIdentity, usize>,
}

impl GatedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identity: &str, bytes: Vec<u8>) {
        self.contents.insert(ResourceIdentity::new(identity), bytes);
    }

    /// Insert a blank PNG of the given size
    pub fn insert_png(&self, identity: &str, width: u32, height: u32) {
        self.insert(identity, png_bytes(width, height));
    }

    /// Block fetches of `identity` until [`release`](Self::release)
    pub fn hold(&self, identity: &str) {
        self.gates
            .insert(ResourceIdentity::new(identity), Arc::new(Semaphore::new(0)));
    }

    /// Unblock every pending and future fetch of `identity`
    pub fn release(&self, identity: &str) {
        if let Some((_, gate)) = self.gates.remove(&ResourceIdentity::new(identity)) {
            gate.close();
        }
    }

    pub fn fetch_count(&self, identity: &str) -> usize {
        self.fetches
            .get(&ResourceIdentity::new(identity))
            .map_or(0, |c| *c)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.iter().map(|e| *e.value()).sum()
    }

    /// Yield until `identity` has been fetched at least `count` times
    pub async fn wait_for_fetch(&self, identity: &str, count: usize) {
        while self.fetch_count(identity) < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ResourceFetcher for GatedFetcher {
    async fn fetch(&self, identity: &ResourceIdentity) -> Result<Vec<u8>, FetchError> {
        *self.fetches.entry(identity.clone()).or_insert(0) += 1;

        let gate = self.gates.get(identity).map(|g| Arc::clone(g.value()));
        if let Some(gate) = gate {
            // closed on release
            let _ = gate.acquire().await;
        }

        self.contents
            .get(identity)
            .map(|bytes| bytes.clone())
            .ok_or_else(|| FetchError::NotFound(identity.to_string()))
    }
}

/// Editor context wired to in-memory fakes
pub struct TestContext {
    pub ctx: EditorContext,
    pub events: EventReceiver,
    pub resolver: Arc<StaticResolver>,
    pub fetcher: Arc<GatedFetcher>,
}

impl TestContext {
    pub fn new() -> Self {
        let resolver = Arc::new(StaticResolver::new());
        let fetcher = Arc::new(GatedFetcher::new());
        let textures = TextureCache::new(
            Arc::clone(&fetcher) as Arc<dyn ResourceFetcher>,
            TextureDecoder,
            DEFAULT_CAPACITY_BYTES,
        );
        let (signals, events) = EditorSignals::channel();
        let ctx = EditorContext::new(
            Arc::clone(&resolver) as Arc<dyn MediaResolver>,
            textures,
            signals,
        );

        Self {
            ctx,
            events,
            resolver,
            fetcher,
        }
    }

    /// Drain every queued event
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the next event
    pub async fn next_event(&mut self) -> EditorEvent {
        self.events.recv().await.unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn entity(name: &str, components: Vec<ComponentRecord>) -> EntityRecord {
    EntityRecord {
        uuid: Uuid::new_v4(),
        name: name.to_string(),
        parent: None,
        index: 0,
        components,
    }
}

fn base_components() -> Vec<ComponentRecord> {
    vec![
        ComponentRecord::new(
            "transform",
            json!({
                "position": [1.0, 2.0, 3.0],
                "rotation": [0.0, 0.5, 0.0],
                "scale": [1.0, 1.0, 1.0],
            }),
        ),
        ComponentRecord::new("visible", json!({ "visible": true })),
    ]
}

/// Spinning cube entity; `None` omits the speed key
pub fn spinning_cube_entity(speed: Option<f64>) -> EntityRecord {
    let props = match speed {
        Some(speed) => json!({ "speed": speed }),
        None => json!({}),
    };
    let mut components = base_components();
    components.push(ComponentRecord::new("spinning-cube", props));
    entity("Spinning Cube", components)
}

/// Image entity referencing `src`
pub fn image_entity(src: &str) -> EntityRecord {
    let mut components = base_components();
    components.push(ComponentRecord::new(
        "image",
        json!({ "src": src, "projection": "flat" }),
    ));
    entity("Image", components)
}

pub fn group_entity(name: &str) -> EntityRecord {
    let mut components = base_components();
    components.push(ComponentRecord::new("group", json!({})));
    entity(name, components)
}

/// Group with a cube and an image under it
pub fn sample_document(image_src: &str) -> SceneDocument {
    let group = group_entity("Props");
    let mut cube = spinning_cube_entity(Some(20.0));
    cube.parent = Some(group.uuid);
    cube.index = 0;
    let mut image = image_entity(image_src);
    image.parent = Some(group.uuid);
    image.index = 1;

    let mut document = SceneDocument::new("Sample");
    document.entities = vec![group, cube, image];
    document
}
