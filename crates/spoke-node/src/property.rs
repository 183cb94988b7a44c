//! Resource-backed node properties
//!
//! A [`ResourceProperty`] owns the reference a user asked for and the texture
//! currently applied to its node. Assigning a new reference starts a
//! resolve → fetch/decode → apply pipeline without blocking the caller.
//!
//! # Supersession
//!
//! Every accepted request advances an internal token. A pipeline only applies
//! its result, reports errors and emits notifications if its token is still
//! current when it finishes. Stale pipelines run to completion but their
//! results are dropped, errors included.
//!
//! # Locking
//!
//! The slot lock is taken before the node's live-state lock. Neither is held
//! across an `.await`.
//!
//! # Cancellation
//!
//! Dropping a pipeline before it settles (an aborted task, or a [`LoadTask`]
//! that is never polled) releases its in-flight mark if it is still current,
//! so the same reference can be requested again.

use crate::base::{LiveState, NodeId, SharedLiveState};
use crate::context::EditorContext;
use crate::detect::perf_issues;
use crate::error::ResourcePropertyError;
use crate::issue::Issue;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use spoke_resource::{LoadError, TextureArtifact};
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Weak};

/// Unstarted resource pipeline handed to a [`LoadScheduler`]
pub type LoadTask = BoxFuture<'static, ()>;

/// Callback invoked for every authoritative load failure
pub type LoadErrorCallback = Arc<dyn Fn(NodeId, &ResourcePropertyError) + Send + Sync>;

/// Collects resource pipelines started while deserializing a scene
///
/// The scene loader implements this to know when every node has settled.
pub trait LoadScheduler {
    /// Take ownership of a pipeline; the scheduler must drive it to completion
    fn schedule(&mut self, task: LoadTask);
}

impl LoadScheduler for Vec<LoadTask> {
    fn schedule(&mut self, task: LoadTask) {
        self.push(task);
    }
}

#[derive(Debug, Default)]
struct Slot {
    requested: String,
    applied: String,
    artifact: Option<Arc<TextureArtifact>>,
    token: u64,
    in_flight: bool,
}

/// A texture reference property with last-write-wins loading
pub struct ResourceProperty {
    name: &'static str,
    node: NodeId,
    slot: Arc<Mutex<Slot>>,
    live: SharedLiveState,
}

impl ResourceProperty {
    /// Create an empty property bound to a node's live state
    #[must_use]
    pub fn new(name: &'static str, node: NodeId, live: SharedLiveState) -> Self {
        Self {
            name,
            node,
            slot: Arc::default(),
            live,
        }
    }

    /// Property name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last requested reference, possibly not yet applied
    #[must_use]
    pub fn get(&self) -> String {
        self.slot.lock().requested.clone()
    }

    /// Reference whose texture is currently applied, empty if none
    #[must_use]
    pub fn applied(&self) -> String {
        self.slot.lock().applied.clone()
    }

    /// Currently applied texture
    #[must_use]
    pub fn artifact(&self) -> Option<Arc<TextureArtifact>> {
        self.slot.lock().artifact.clone()
    }

    /// Whether an authoritative pipeline is outstanding
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.slot.lock().in_flight
    }

    /// Record `value` as requested and return its pipeline, if one is needed
    ///
    /// Returns `None` when the request is a no-op: the value is already the
    /// requested one and is either applied or being loaded. An empty value
    /// clears the property and settles immediately without resolving.
    ///
    /// The returned task does nothing until polled.
    #[must_use = "the pipeline does nothing unless scheduled"]
    pub fn request(
        &self,
        ctx: &EditorContext,
        value: impl Into<String>,
        on_error: Option<LoadErrorCallback>,
    ) -> Option<LoadTask> {
        let value = value.into();
        let mut slot = self.slot.lock();

        if value.is_empty() {
            if slot.requested.is_empty() && slot.applied.is_empty() && !slot.in_flight {
                return None;
            }
            slot.token += 1;
            slot.requested.clear();
            slot.applied.clear();
            slot.artifact = None;
            slot.in_flight = false;
            {
                let mut live = self.live.lock();
                live.issues.clear();
                live.attribution = None;
            }
            drop(slot);

            tracing::debug!(node = %self.node, property = self.name, "resource cleared");
            ctx.signals.node_settled(self.node, self.name);
            return None;
        }

        if value == slot.requested && (value == slot.applied || slot.in_flight) {
            return None;
        }

        slot.token += 1;
        slot.requested.clone_from(&value);
        slot.in_flight = true;
        let token = slot.token;
        self.live.lock().issues.clear();
        drop(slot);

        tracing::debug!(node = %self.node, property = self.name, reference = %value, token, "resource requested");

        let pipeline = Pipeline {
            ctx: ctx.clone(),
            name: self.name,
            node: self.node,
            slot: Arc::downgrade(&self.slot),
            live: Arc::downgrade(&self.live),
            value,
            token,
            on_error,
        };
        Some(Box::pin(pipeline.run()))
    }

    /// Request `value` and run its pipeline in the background
    ///
    /// Failures are reported through issues and the diagnostic log only.
    /// Must be called within a Tokio runtime.
    pub fn set_requested(&self, ctx: &EditorContext, value: impl Into<String>) {
        if let Some(task) = self.request(ctx, value, None) {
            tokio::spawn(task);
        }
    }

    /// Copy for another node, sharing the applied texture without reloading
    ///
    /// An in-flight request on the source is not carried over.
    #[must_use]
    pub fn duplicate_for(&self, node: NodeId, live: SharedLiveState) -> Self {
        let source = self.slot.lock();
        let slot = Slot {
            requested: source.applied.clone(),
            applied: source.applied.clone(),
            artifact: source.artifact.clone(),
            token: 0,
            in_flight: false,
        };
        Self {
            name: self.name,
            node,
            slot: Arc::new(Mutex::new(slot)),
            live,
        }
    }
}

impl Debug for ResourceProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("ResourceProperty")
            .field("name", &self.name)
            .field("node", &self.node)
            .field("requested", &slot.requested)
            .field("applied", &slot.applied)
            .field("in_flight", &slot.in_flight)
            .finish_non_exhaustive()
    }
}

struct Pipeline {
    ctx: EditorContext,
    name: &'static str,
    node: NodeId,
    slot: Weak<Mutex<Slot>>,
    live: Weak<Mutex<LiveState>>,
    value: String,
    token: u64,
    on_error: Option<LoadErrorCallback>,
}

impl Pipeline {
    async fn run(self) {
        let outcome = self.load().await;

        let (Some(slot), Some(live)) = (self.slot.upgrade(), self.live.upgrade()) else {
            tracing::trace!(node = %self.node, property = self.name, "node dropped before load settled");
            return;
        };

        let mut slot = slot.lock();
        if slot.token != self.token {
            tracing::trace!(
                node = %self.node,
                property = self.name,
                reference = %self.value,
                "superseded load discarded"
            );
            return;
        }
        slot.in_flight = false;

        let mut issues = Vec::new();
        let mut failure = None;
        match outcome {
            Ok(artifact) => {
                slot.applied.clone_from(&self.value);
                slot.artifact = Some(artifact);
            }
            Err(source) => {
                let error = ResourcePropertyError {
                    node: self.node,
                    property: self.name,
                    reference: self.value.clone(),
                    source,
                };
                tracing::error!(
                    target: "spoke::load",
                    node = %self.node,
                    property = self.name,
                    reference = %self.value,
                    cause = %error.source,
                    "resource load failed"
                );
                issues.push(Issue::error(format!("Error loading {} '{}'.", self.name, self.value)));
                failure = Some(error);
            }
        }

        issues.extend(perf_issues(slot.artifact.as_deref(), &self.ctx.thresholds));
        live.lock().issues = issues;
        drop(slot);

        if let (Some(callback), Some(error)) = (&self.on_error, &failure) {
            callback(self.node, error);
        }
        self.ctx.signals.node_settled(self.node, self.name);
    }

    async fn load(&self) -> Result<Arc<TextureArtifact>, Arc<LoadError>> {
        let media = self
            .ctx
            .resolver
            .resolve(&self.value)
            .await
            .map_err(|e| Arc::new(LoadError::from(e)))?;

        if let (Some(slot), Some(live)) = (self.slot.upgrade(), self.live.upgrade()) {
            let slot = slot.lock();
            if slot.token == self.token {
                live.lock().attribution.clone_from(&media.attribution);
            }
        }

        self.ctx.textures.get(&media.identity).await
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        let Some(slot) = self.slot.upgrade() else {
            return;
        };
        let mut slot = slot.lock();
        if slot.token == self.token && slot.in_flight {
            slot.in_flight = false;
            tracing::debug!(
                node = %self.node,
                property = self.name,
                reference = %self.value,
                "resource load abandoned before settling"
            );
        }
    }
}
