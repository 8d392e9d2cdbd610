//! Traversal-safe path resolution against a fixed storage root.
//!
//! Every path handed to the filesystem by this crate comes out of
//! [`PathResolver`]. Untrusted input is split into segments and applied to
//! the canonical root one component at a time; the result must stay equal to
//! or below the root or the call fails with a path-traversal error.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::warn;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;

/// Resolves caller-supplied relative paths below a canonical storage root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Canonical absolute storage root.
    root: PathBuf,
}

impl PathResolver {
    /// Create the root directory if needed and canonicalize it.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        fs::create_dir_all(root_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {root_path}"),
                e,
            )
        })?;
        let root = fs::canonicalize(root_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to canonicalize storage root: {root_path}"),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The canonical storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lexically resolve `relative` below the root without touching the filesystem.
    ///
    /// Both `/` and `\` separate segments. Empty and `.` segments are skipped,
    /// `..` removes the previous segment, and absolute prefixes are joined
    /// rather than honored. Whitespace-only segments are literal names.
    pub fn resolve(&self, relative: &str) -> AppResult<PathBuf> {
        if relative.contains('\0') {
            return Err(traversal(relative));
        }

        let mut resolved = self.root.clone();
        for segment in relative.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => {
                    if resolved == self.root {
                        return Err(traversal(relative));
                    }
                    resolved.pop();
                }
                name => {
                    if !is_single_normal_component(name) {
                        return Err(traversal(relative));
                    }
                    resolved.push(name);
                }
            }
        }

        if !resolved.starts_with(&self.root) {
            return Err(traversal(relative));
        }
        Ok(resolved)
    }

    /// Resolve `relative` and then follow symlinks on the part that exists.
    ///
    /// The deepest existing ancestor of the lexical result is canonicalized
    /// and re-checked against the root, so a link inside the root pointing
    /// elsewhere is rejected. A dangling symlink is rejected as well, since
    /// creating a file through it would land wherever it points.
    pub async fn resolve_existing(&self, relative: &str) -> AppResult<PathBuf> {
        let lexical = self.resolve(relative)?;

        let mut existing = lexical.clone();
        let mut remainder: Vec<OsString> = Vec::new();
        loop {
            match fs::canonicalize(&existing).await {
                Ok(canonical) => {
                    if !canonical.starts_with(&self.root) {
                        warn!(path = %relative, "Symlink escape from storage root rejected");
                        return Err(traversal(relative));
                    }
                    let mut out = canonical;
                    for part in remainder.iter().rev() {
                        out.push(part);
                    }
                    return Ok(out);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    if fs::symlink_metadata(&existing).await.is_ok() {
                        warn!(path = %relative, "Dangling symlink in storage root rejected");
                        return Err(traversal(relative));
                    }
                    let Some(name) = existing.file_name().map(|n| n.to_os_string()) else {
                        return Err(traversal(relative));
                    };
                    remainder.push(name);
                    existing.pop();
                    if !existing.starts_with(&self.root) {
                        return Err(traversal(relative));
                    }
                }
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        "Failed to canonicalize storage path",
                        e,
                    ));
                }
            }
        }
    }
}

fn is_single_normal_component(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn traversal(relative: &str) -> AppError {
    AppError::path_traversal(format!("Path escapes the storage root: {relative:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn resolver() -> (tempfile::TempDir, PathResolver) {
        let dir = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(dir.path().join("root").to_str().unwrap())
            .await
            .unwrap();
        (dir, resolver)
    }

    #[tokio::test]
    async fn test_empty_and_separator_only_resolve_to_root() {
        let (_dir, r) = resolver().await;
        assert_eq!(r.resolve("").unwrap(), r.root());
        assert_eq!(r.resolve("///").unwrap(), r.root());
        assert_eq!(r.resolve("./.").unwrap(), r.root());
    }

    #[tokio::test]
    async fn test_dotdot_escapes_are_rejected() {
        let (_dir, r) = resolver().await;
        for input in [
            "..",
            "../etc/passwd",
            "a/../../b",
            "a/b/../../..",
            "..\\..\\windows",
            "/../../",
        ] {
            let err = r.resolve(input).unwrap_err();
            assert!(err.is(ErrorKind::PathTraversal), "{input} was accepted");
        }
    }

    #[tokio::test]
    async fn test_dotdot_inside_root_is_collapsed() {
        let (_dir, r) = resolver().await;
        assert_eq!(r.resolve("a/b/../c").unwrap(), r.root().join("a").join("c"));
        assert_eq!(r.resolve("a/..").unwrap(), r.root());
    }

    #[tokio::test]
    async fn test_absolute_input_is_joined_below_root() {
        let (_dir, r) = resolver().await;
        let resolved = r.resolve("/etc/passwd").unwrap();
        assert_eq!(resolved, r.root().join("etc").join("passwd"));
    }

    #[tokio::test]
    async fn test_backslash_separates_segments() {
        let (_dir, r) = resolver().await;
        assert_eq!(r.resolve("a\\b").unwrap(), r.root().join("a").join("b"));
    }

    #[tokio::test]
    async fn test_null_byte_is_rejected() {
        let (_dir, r) = resolver().await;
        assert!(r.resolve("a\0b").unwrap_err().is(ErrorKind::PathTraversal));
    }

    #[tokio::test]
    async fn test_whitespace_segment_is_literal() {
        let (_dir, r) = resolver().await;
        assert_eq!(r.resolve(" /x").unwrap(), r.root().join(" ").join("x"));
    }

    #[tokio::test]
    async fn test_sibling_prefix_is_not_inside_root() {
        let (dir, r) = resolver().await;
        tokio::fs::create_dir_all(dir.path().join("root-evil"))
            .await
            .unwrap();
        let err = r.resolve("../root-evil/x").unwrap_err();
        assert!(err.is(ErrorKind::PathTraversal));
    }

    #[tokio::test]
    async fn test_resolve_existing_appends_missing_tail() {
        let (_dir, r) = resolver().await;
        tokio::fs::create_dir_all(r.root().join("a")).await.unwrap();
        let resolved = r.resolve_existing("a/new/file.txt").await.unwrap();
        assert_eq!(resolved, r.root().join("a").join("new").join("file.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_is_rejected() {
        let (dir, r) = resolver().await;
        let outside = dir.path().join("outside");
        tokio::fs::create_dir_all(&outside).await.unwrap();
        std::os::unix::fs::symlink(&outside, r.root().join("link")).unwrap();

        assert!(r.resolve("link/secret").is_ok());
        let err = r.resolve_existing("link/secret").await.unwrap_err();
        assert!(err.is(ErrorKind::PathTraversal));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_rejected() {
        let (dir, r) = resolver().await;
        std::os::unix::fs::symlink(dir.path().join("nowhere"), r.root().join("dangling")).unwrap();

        let err = r.resolve_existing("dangling").await.unwrap_err();
        assert!(err.is(ErrorKind::PathTraversal));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_within_root_is_allowed() {
        let (_dir, r) = resolver().await;
        tokio::fs::create_dir_all(r.root().join("real")).await.unwrap();
        std::os::unix::fs::symlink(r.root().join("real"), r.root().join("alias")).unwrap();

        let resolved = r.resolve_existing("alias/f").await.unwrap();
        assert_eq!(resolved, r.root().join("real").join("f"));
    }
}
