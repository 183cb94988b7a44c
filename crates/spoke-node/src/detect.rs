//! Issue detection over a node's resolved resources
//!
//! Pure functions: they read artifacts and thresholds and return issues. The
//! caller stores the result.

use crate::issue::Issue;
use serde::{Deserialize, Serialize};
use spoke_resource::TextureArtifact;

/// Thresholds used by the issue detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueThresholds {
    /// Largest texture width or height before a warning
    pub max_texture_dimension: u32,
    /// Largest encoded file size before a warning
    pub max_file_bytes: u64,
    /// Emit an info issue for non power-of-two textures
    pub warn_non_power_of_two: bool,
}

impl Default for IssueThresholds {
    fn default() -> Self {
        Self {
            max_texture_dimension: 2048,
            max_file_bytes: 8 * 1024 * 1024,
            warn_non_power_of_two: true,
        }
    }
}

impl IssueThresholds {
    /// With max texture dimension
    #[inline]
    #[must_use]
    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = max;
        self
    }

    /// With max encoded file size
    #[inline]
    #[must_use]
    pub fn with_max_file_bytes(mut self, max: u64) -> Self {
        self.max_file_bytes = max;
        self
    }
}

/// Issues for a decoded texture
#[must_use]
pub fn texture_issues(texture: &TextureArtifact, thresholds: &IssueThresholds) -> Vec<Issue> {
    let mut issues = Vec::new();

    let largest = texture.width.max(texture.height);
    if largest > thresholds.max_texture_dimension {
        issues.push(Issue::warning(format!(
            "Texture is {}x{}; textures larger than {}px may not load on mobile devices.",
            texture.width, texture.height, thresholds.max_texture_dimension
        )));
    }

    // encoded_bytes of 0 means the transport did not report a size
    let size = texture.encoded_bytes as u64;
    if size > 0 && size > thresholds.max_file_bytes {
        issues.push(Issue::warning(format!(
            "Texture file is {}; files larger than {} increase scene load time.",
            format_bytes(size),
            format_bytes(thresholds.max_file_bytes)
        )));
    }

    if thresholds.warn_non_power_of_two && !texture.is_power_of_two() {
        issues.push(Issue::info(format!(
            "Texture is {}x{}; non power-of-two textures cannot use mipmaps.",
            texture.width, texture.height
        )));
    }

    issues
}

/// Performance issues for an optional resolved texture
///
/// Nothing resolved means nothing to measure, so no issues.
#[must_use]
pub fn perf_issues(texture: Option<&TextureArtifact>, thresholds: &IssueThresholds) -> Vec<Issue> {
    texture
        .map(|t| texture_issues(t, thresholds))
        .unwrap_or_default()
}

fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use spoke_resource::ResourceIdentity;

    fn texture(width: u32, height: u32, encoded_bytes: usize) -> TextureArtifact {
        TextureArtifact {
            identity: ResourceIdentity::new("t.png"),
            width,
            height,
            encoded_bytes,
            rgba: Vec::new(),
        }
    }

    #[test]
    fn small_texture_has_no_issues() {
        let issues = texture_issues(&texture(256, 256, 1024), &IssueThresholds::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn oversized_dimensions_warn() {
        let issues = texture_issues(&texture(4096, 1024, 1024), &IssueThresholds::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("4096x1024"));
    }

    #[test]
    fn large_file_warns() {
        let thresholds = IssueThresholds::default().with_max_file_bytes(1024);
        let issues = texture_issues(&texture(64, 64, 4096), &thresholds);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("4.0 KiB"));
    }

    #[test]
    fn unknown_size_is_not_an_issue() {
        let thresholds = IssueThresholds::default().with_max_file_bytes(0);
        assert!(texture_issues(&texture(64, 64, 0), &thresholds).is_empty());
    }

    #[test]
    fn non_power_of_two_is_info() {
        let issues = texture_issues(&texture(100, 64, 10), &IssueThresholds::default());
        assert_eq!(issues, vec![Issue::info(
            "Texture is 100x64; non power-of-two textures cannot use mipmaps."
        )]);
    }

    #[test]
    fn perf_issues_without_texture() {
        assert!(perf_issues(None, &IssueThresholds::default()).is_empty());
    }
}
