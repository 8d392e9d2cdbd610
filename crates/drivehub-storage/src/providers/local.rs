//! Local filesystem storage provider.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::{ByteStream, StorageProvider};

use crate::resolver::PathResolver;

/// Suffix of in-flight upload artifacts. Stored names only carry
/// alphanumeric extensions, so no committed artifact can end with it.
const PARTIAL_SUFFIX: &str = ".~partial";

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Resolver for every key this provider touches.
    resolver: PathResolver,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let resolver = PathResolver::new(root_path).await?;
        info!(root = %resolver.root().display(), "Local storage ready");
        Ok(Self { resolver })
    }

    /// The resolver guarding this provider's root.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Remove `.~partial` artifacts left behind by interrupted uploads.
    ///
    /// Symlinks are never followed. Returns the number of files removed.
    pub async fn sweep_partials(&self) -> AppResult<u64> {
        let mut removed = 0u64;
        let mut pending = vec![self.resolver.root().to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to read storage directory", e)
            })?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
            })? {
                let file_type = entry.file_type().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to get entry type", e)
                })?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file()
                    && entry.file_name().to_string_lossy().ends_with(PARTIAL_SUFFIX)
                {
                    fs::remove_file(&path).await.map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Storage,
                            "Failed to remove partial upload",
                            e,
                        )
                    })?;
                    removed += 1;
                }
            }
        }

        debug!(removed, "Partial upload sweep finished");
        Ok(removed)
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to create parent directory", e)
            })?;
        }
        Ok(())
    }
}

/// Removes an in-flight artifact unless disarmed.
///
/// Runs on every exit path of a write, including the write future being
/// dropped when the client goes away.
struct PartialGuard {
    path: PathBuf,
    armed: bool,
}

impl PartialGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialGuard {
    // Drop cannot await, and one unlink is cheap enough to run inline on the
    // worker thread.
    fn drop(&mut self) {
        if self.armed {
            match std::fs::remove_file(&self.path) {
                Ok(()) => debug!(path = %self.path.display(), "Removed partial upload"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Failed to remove partial upload")
                }
            }
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(self.resolver.root())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read(&self, key: &str) -> AppResult<(ByteStream, u64)> {
        let full_path = self.resolver.resolve_existing(key).await?;
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AppError::not_found("Stored file not found")
            } else {
                AppError::with_source(ErrorKind::Storage, "Failed to open stored file", e)
            }
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to stat stored file", e))?
            .len();

        Ok((Box::pin(ReaderStream::new(file)), size))
    }

    async fn write_stream(
        &self,
        key: &str,
        mut stream: ByteStream,
        limit: Option<u64>,
    ) -> AppResult<u64> {
        let full_path = self.resolver.resolve_existing(key).await?;
        self.ensure_parent(&full_path).await?;

        let partial = partial_path(&full_path);
        let mut guard = PartialGuard::new(partial.clone());
        let mut file = fs::File::create(&partial).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create upload file", e)
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Upload stream failed", e))?;
            total_bytes += chunk.len() as u64;
            if let Some(limit) = limit {
                if total_bytes > limit {
                    return Err(AppError::payload_too_large(format!(
                        "Upload exceeds the maximum size of {limit} bytes"
                    )));
                }
            }
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;
        drop(file);

        fs::rename(&partial, &full_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to commit upload", e)
        })?;
        guard.disarm();

        debug!(key, bytes = total_bytes, "Wrote file from stream");
        Ok(total_bytes)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolver.resolve_existing(key).await?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                "Failed to delete stored file",
                e,
            )),
        }
    }

    async fn create_dir(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolver.resolve_existing(key).await?;
        fs::create_dir_all(&full_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create directory", e)
        })?;
        Ok(())
    }

    async fn delete_dir(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolver.resolve_existing(key).await?;
        if full_path == self.resolver.root() {
            return Err(AppError::validation("Refusing to delete the storage root"));
        }
        match fs::remove_dir_all(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                "Failed to delete directory",
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_path = self.resolver.resolve_existing(key).await?;
        fs::try_exists(&full_path)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to stat path", e))
    }
}

/// Guess a MIME type from a file name's extension.
pub fn mime_from_name(name: &str) -> Option<String> {
    mime_guess::from_path(name).first().map(|m| m.essence_str().to_string())
}
