//! Scene-wide load tracking

use spoke_node::{LoadScheduler, LoadTask, ResourcePropertyError};
use tokio::task::JoinSet;

/// Tracks every resource pipeline scheduled while a scene is deserialized
///
/// Pipelines start running as soon as they are scheduled; [`settle`](Self::settle)
/// waits for all of them.
#[derive(Debug, Default)]
pub struct SceneLoadTracker {
    tasks: JoinSet<()>,
    scheduled: usize,
}

/// Outcome of waiting for a scene's pipelines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleSummary {
    /// Pipelines that ran to completion
    pub completed: usize,
    /// Pipelines that panicked
    pub panicked: usize,
}

impl SceneLoadTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pipelines scheduled so far
    #[inline]
    #[must_use]
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Pipelines not yet joined
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every scheduled pipeline has settled
    ///
    /// A panicking pipeline is logged and counted; it never aborts the others.
    pub async fn settle(mut self) -> SettleSummary {
        let mut summary = SettleSummary::default();
        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(()) => summary.completed += 1,
                Err(e) if e.is_panic() => {
                    tracing::error!(target: "spoke::load", error = %e, "resource pipeline panicked");
                    summary.panicked += 1;
                }
                Err(e) => tracing::debug!(error = %e, "resource pipeline cancelled"),
            }
        }
        summary
    }
}

impl LoadScheduler for SceneLoadTracker {
    fn schedule(&mut self, task: LoadTask) {
        self.scheduled += 1;
        self.tasks.spawn(task);
    }
}

/// Result of loading a scene document
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Nodes placed in the scene
    pub nodes: usize,
    /// Resource pipelines scheduled
    pub scheduled: usize,
    /// Pipelines that panicked
    pub panicked: usize,
    /// Per-node resource failures reported during the load
    pub errors: Vec<ResourcePropertyError>,
}

impl LoadReport {
    /// Check if every node loaded without resource errors
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.panicked == 0
    }
}
