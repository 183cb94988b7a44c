//! Resolved resource identities and attribution metadata
//!
//! A [`ResourceIdentity`] is what a [`MediaResolver`](crate::MediaResolver) hands
//! back for a raw user reference. It is the key of the resource cache, so two
//! different spellings of the same asset share one cache entry.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Resolved, access-safe reference to an external asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceIdentity(String);

impl ResourceIdentity {
    /// Create identity from an already resolved string
    #[inline]
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Borrow the identity string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension of the identity, lowercased
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let name = self.0.rsplit(['/', '\\']).next()?;
        let (_, ext) = name.rsplit_once('.')?;
        (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }
}

impl Display for ResourceIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceIdentity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Attribution metadata attached to a node when its media resolves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribution {
    /// Title of the work
    pub title: Option<String>,
    /// Author or creator
    pub author: Option<String>,
    /// Source page for the work
    pub url: Option<String>,
}

impl Attribution {
    /// True when no field carries a value
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.url.is_none()
    }
}

/// Result of resolving a user reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    /// Accessible identity used for fetching and caching
    pub identity: ResourceIdentity,
    /// Attribution, when the source provides one
    pub attribution: Option<Attribution>,
}

impl ResolvedMedia {
    /// Resolved media without attribution
    #[inline]
    #[must_use]
    pub fn new(identity: impl Into<ResourceIdentity>) -> Self {
        Self {
            identity: identity.into(),
            attribution: None,
        }
    }

    /// Attach attribution
    #[inline]
    #[must_use]
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = (!attribution.is_empty()).then_some(attribution);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_extension() {
        assert_eq!(
            ResourceIdentity::new("/assets/Textures/Wall.PNG").extension(),
            Some("png".to_string())
        );
        assert_eq!(ResourceIdentity::new("/assets/dir.v2/noext").extension(), None);
        assert_eq!(ResourceIdentity::new("trailing.").extension(), None);
    }

    #[test]
    fn identity_serializes_as_string() {
        let id = ResourceIdentity::new("a.png");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"a.png\"");
    }

    #[test]
    fn empty_attribution_is_dropped() {
        let media = ResolvedMedia::new("a.png").with_attribution(Attribution::default());
        assert!(media.attribution.is_none());

        let media = ResolvedMedia::new("a.png").with_attribution(Attribution {
            author: Some("Ada".to_string()),
            ..Attribution::default()
        });
        assert_eq!(media.attribution.unwrap().author.as_deref(), Some("Ada"));
    }
}
