//! Media resolution
//!
//! Maps raw user references (paths typed into a property panel, values read
//! from a scene document) onto [`ResourceIdentity`] values that are safe to
//! fetch, plus any attribution the source publishes.

use crate::error::ResolveError;
use crate::identity::{Attribution, ResolvedMedia, ResourceIdentity};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Suffix of the optional attribution sidecar next to a local asset
pub const ATTRIBUTION_SUFFIX: &str = ".attribution.json";

/// Resolver capability consumed by node resource properties
///
/// Implement this trait to plug a different media source (asset server,
/// remote media proxy) into the editor.
#[async_trait]
pub trait MediaResolver: Send + Sync + 'static {
    /// Resolve a user reference into an accessible identity
    async fn resolve(&self, reference: &str) -> Result<ResolvedMedia, ResolveError>;
}

/// Resolver sandboxed to a local asset directory
///
/// Accepts root-relative paths and `file://` references. Absolute paths and
/// anything that would leave the root (parent components, symlinks pointing
/// outside) are rejected.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    /// Create resolver rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Strip the scheme and validate the remaining relative path
    fn relative_path(reference: &str) -> Result<PathBuf, ResolveError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ResolveError::EmptyReference);
        }

        let path = match reference.split_once("://") {
            Some(("file", rest)) => rest,
            Some((scheme, _)) => {
                return Err(ResolveError::UnsupportedScheme {
                    reference: reference.to_string(),
                    scheme: scheme.to_string(),
                })
            }
            None => reference,
        };

        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(ResolveError::OutsideRoot(reference.to_string()));
        }

        Ok(relative.to_path_buf())
    }

    async fn read_attribution(path: &Path) -> Result<Option<Attribution>, ResolveError> {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(ATTRIBUTION_SUFFIX);
        let sidecar = PathBuf::from(sidecar);

        match tokio::fs::read_to_string(&sidecar).await {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| ResolveError::Attribution {
                    path: sidecar,
                    source,
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ResolveError::io_error(sidecar, e)),
        }
    }
}

#[async_trait]
impl MediaResolver for DirectoryResolver {
    async fn resolve(&self, reference: &str) -> Result<ResolvedMedia, ResolveError> {
        let relative = Self::relative_path(reference)?;

        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| ResolveError::io_error(&self.root, e))?;

        let full = root.join(&relative);
        let canonical = match tokio::fs::canonicalize(&full).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ResolveError::NotFound(reference.to_string()))
            }
            Err(e) => return Err(ResolveError::io_error(full, e)),
        };

        if !canonical.starts_with(&root) {
            return Err(ResolveError::OutsideRoot(reference.to_string()));
        }

        let attribution = Self::read_attribution(&canonical).await?;
        tracing::debug!(reference, identity = %canonical.display(), "resolved media");

        let media = ResolvedMedia::new(ResourceIdentity::new(canonical.to_string_lossy()));
        Ok(match attribution {
            Some(attribution) => media.with_attribution(attribution),
            None => media,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_accepts_plain_and_file_scheme() {
        assert_eq!(
            DirectoryResolver::relative_path("textures/a.png").unwrap(),
            PathBuf::from("textures/a.png")
        );
        assert_eq!(
            DirectoryResolver::relative_path("file://textures/a.png").unwrap(),
            PathBuf::from("textures/a.png")
        );
    }

    #[test]
    fn relative_path_rejects_escapes() {
        assert!(matches!(
            DirectoryResolver::relative_path("../outside.png"),
            Err(ResolveError::OutsideRoot(_))
        ));
        assert!(matches!(
            DirectoryResolver::relative_path("a/../../b.png"),
            Err(ResolveError::OutsideRoot(_))
        ));
    }

    #[test]
    fn relative_path_rejects_absolute() {
        for reference in ["/textures/a.png", "file:///textures/a.png", "/"] {
            assert!(
                matches!(
                    DirectoryResolver::relative_path(reference),
                    Err(ResolveError::OutsideRoot(_))
                ),
                "{reference} accepted"
            );
        }
    }

    #[test]
    fn relative_path_rejects_empty_and_remote() {
        assert!(matches!(
            DirectoryResolver::relative_path("   "),
            Err(ResolveError::EmptyReference)
        ));
        assert!(matches!(
            DirectoryResolver::relative_path("https://example.com/a.png"),
            Err(ResolveError::UnsupportedScheme { .. })
        ));
    }

    #[tokio::test]
    async fn resolves_existing_file_with_attribution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"png").unwrap();
        std::fs::write(
            dir.path().join("a.png.attribution.json"),
            r#"{"title":"Wall","author":"Ada"}"#,
        )
        .unwrap();

        let resolver = DirectoryResolver::new(dir.path());
        let media = resolver.resolve("a.png").await.unwrap();

        assert!(media.identity.as_str().ends_with("a.png"));
        let attribution = media.attribution.unwrap();
        assert_eq!(attribution.title.as_deref(), Some("Wall"));
        assert_eq!(attribution.author.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn spellings_of_one_file_share_identity() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tex")).unwrap();
        std::fs::write(dir.path().join("tex/a.png"), b"png").unwrap();

        let resolver = DirectoryResolver::new(dir.path());
        let a = resolver.resolve("tex/a.png").await.unwrap();
        let b = resolver.resolve("./tex/./a.png").await.unwrap();
        assert_eq!(a.identity, b.identity);
    }

    #[tokio::test]
    async fn absolute_reference_to_existing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("textures")).unwrap();
        std::fs::write(dir.path().join("textures/a.png"), b"png").unwrap();

        let resolver = DirectoryResolver::new(dir.path());
        assert!(resolver.resolve("textures/a.png").await.is_ok());
        let err = resolver.resolve("/textures/a.png").await.unwrap_err();
        assert!(matches!(err, ResolveError::OutsideRoot(_)));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DirectoryResolver::new(dir.path());

        let err = resolver.resolve("missing.png").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }
}
