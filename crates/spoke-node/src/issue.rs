//! Node diagnostics ("issues")
//!
//! Issues are shown next to a node in the hierarchy and properties panels.
//! They are recomputed on every load attempt, never accumulated.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational hint
    Info,
    /// Performance or compatibility concern
    Warning,
    /// The node could not be fully loaded
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A structured diagnostic attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Severity classification
    pub severity: Severity,
    /// User-facing message
    pub message: String,
}

impl Issue {
    /// Create new issue
    #[inline]
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Informational issue
    #[inline]
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Warning issue
    #[inline]
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Error issue
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Check if issue is an error
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Highest severity in a list of issues
#[must_use]
pub fn worst_severity(issues: &[Issue]) -> Option<Severity> {
    issues.iter().map(|i| i.severity).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_display() {
        let issue = Issue::error("Error loading image.");
        assert_eq!(issue.to_string(), "[error] Error loading image.");
        assert!(issue.is_error());
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Issue::warning("big")).unwrap();
        assert_eq!(json, r#"{"severity":"warning","message":"big"}"#);
    }

    #[test]
    fn worst_severity_orders() {
        assert_eq!(worst_severity(&[]), None);
        let issues = vec![Issue::info("a"), Issue::error("b"), Issue::warning("c")];
        assert_eq!(worst_severity(&issues), Some(Severity::Error));
    }
}
