//! File upload, download, rename, and delete.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::{ByteStream, StorageProvider};
use drivehub_database::MetadataStore;
use drivehub_entity::file::{CreateFileEntry, FileEntry};
use drivehub_storage::layout;
use drivehub_storage::providers::mime_from_name;

use crate::context::RequestContext;
use crate::file::download::{DownloadMode, FileDownload};
use crate::path::{resolve_directory, validate_name};

/// Fallback content type when the name gives no hint.
const OCTET_STREAM: &str = "application/octet-stream";

/// Manages file operations for the acting owner.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Metadata store.
    metadata: Arc<dyn MetadataStore>,
    /// Physical storage.
    storage: Arc<dyn StorageProvider>,
    /// Upload size limit in bytes.
    max_upload_size_bytes: u64,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        storage: Arc<dyn StorageProvider>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            metadata,
            storage,
            max_upload_size_bytes,
        }
    }

    /// Resolves a virtual path whose last segment names a file.
    pub async fn resolve_path(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
    ) -> AppResult<FileEntry> {
        let Some((name, parents)) = segments.split_last() else {
            return Err(AppError::validation("A file path is required"));
        };
        validate_name(name)?;
        let parent = resolve_directory(self.metadata.as_ref(), ctx, parents).await?;
        self.metadata
            .find_child_file(ctx.user_id, parent.id, name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File '{name}' not found")))
    }

    /// Gets a file owned by the caller.
    pub async fn get(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<FileEntry> {
        self.metadata
            .find_file(ctx.user_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Streams `content` into a new file named `name` under `parent_id`.
    ///
    /// The row is only inserted after the artifact has been fully written.
    /// A failed, oversized, or abandoned upload leaves neither; if the insert
    /// fails the written artifact is removed.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        name: &str,
        content: ByteStream,
    ) -> AppResult<FileEntry> {
        validate_name(name)?;
        let parent = self
            .metadata
            .find_directory(ctx.user_id, parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Directory not found"))?;

        if self
            .metadata
            .find_child_file(ctx.user_id, parent.id, name)
            .await?
            .is_some()
        {
            return Err(AppError::validation(format!(
                "A file named '{name}' already exists here"
            )));
        }

        let stored_name = layout::stored_name(name);
        let key = layout::file_key(ctx.user_id, parent.id, &stored_name);
        let size = self
            .storage
            .write_stream(&key, content, Some(self.max_upload_size_bytes))
            .await?;

        let size_bytes = i64::try_from(size)
            .map_err(|_| AppError::payload_too_large("Upload size exceeds supported range"))?;
        let record = CreateFileEntry {
            id: Uuid::new_v4(),
            original_name: name.to_string(),
            stored_name,
            size_bytes,
            mime_type: mime_from_name(name),
            owner_id: ctx.user_id,
            parent_id: parent.id,
        };

        let file = match self.metadata.insert_file(&record).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    warn!(key = %key, error = %cleanup, "Failed to remove orphaned upload");
                }
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            parent_id = %parent.id,
            size = size,
            "File uploaded"
        );
        Ok(file)
    }

    /// Opens a file for streaming.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        mode: DownloadMode,
    ) -> AppResult<FileDownload> {
        let file = self.get(ctx, file_id).await?;
        let key = layout::file_key(ctx.user_id, file.parent_id, &file.stored_name);
        let (stream, size) = self.storage.read(&key).await?;

        Ok(FileDownload {
            stream,
            size,
            content_type: file
                .mime_type
                .clone()
                .unwrap_or_else(|| OCTET_STREAM.to_string()),
            filename: file.original_name,
            mode,
        })
    }

    /// Changes a file's user-visible name. The artifact is untouched.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_name: &str,
    ) -> AppResult<FileEntry> {
        validate_name(new_name)?;
        let file = self.get(ctx, file_id).await?;
        if file.original_name == new_name {
            return Ok(file);
        }

        let renamed = self
            .metadata
            .rename_file(ctx.user_id, file.id, new_name)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(
            user_id = %ctx.user_id,
            file_id = %renamed.id,
            name = %renamed.original_name,
            "File renamed"
        );
        Ok(renamed)
    }

    /// Deletes a file's artifact and then its row.
    pub async fn delete(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<()> {
        let file = self.get(ctx, file_id).await?;
        let key = layout::file_key(ctx.user_id, file.parent_id, &file.stored_name);
        self.storage.delete(&key).await?;
        self.metadata.delete_file(ctx.user_id, file.id).await?;

        info!(user_id = %ctx.user_id, file_id = %file.id, "File deleted");
        Ok(())
    }
}
