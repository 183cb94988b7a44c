//! Editor session context handed to every node operation

use crate::detect::IssueThresholds;
use crate::signals::EditorSignals;
use spoke_resource::{MediaResolver, TextureCache};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Collaborators owned by one editor session
///
/// Cheap to clone; clones share the cache and the signal channel.
#[derive(Clone)]
pub struct EditorContext {
    /// Maps user references to resource identities
    pub resolver: Arc<dyn MediaResolver>,
    /// Shared decoded textures
    pub textures: TextureCache,
    /// Outbound change notifications
    pub signals: EditorSignals,
    /// Issue detector thresholds
    pub thresholds: IssueThresholds,
}

impl EditorContext {
    /// Create context with default thresholds
    #[must_use]
    pub fn new(resolver: Arc<dyn MediaResolver>, textures: TextureCache, signals: EditorSignals) -> Self {
        Self {
            resolver,
            textures,
            signals,
            thresholds: IssueThresholds::default(),
        }
    }

    /// With issue thresholds
    #[inline]
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: IssueThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl Debug for EditorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorContext")
            .field("textures", &self.textures)
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}
