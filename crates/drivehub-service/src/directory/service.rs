//! Directory CRUD over the metadata tree and its physical directories.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::StorageProvider;
use drivehub_database::MetadataStore;
use drivehub_entity::directory::{CreateDirectory, Directory, DirectoryUpdate};
use drivehub_entity::listing::{DeleteSummary, ListingEntry, sort_listing};
use drivehub_storage::layout;

use crate::context::RequestContext;
use crate::path::{resolve_directory, validate_name};

/// Manages directory operations for the acting owner.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    /// Metadata store.
    metadata: Arc<dyn MetadataStore>,
    /// Physical storage.
    storage: Arc<dyn StorageProvider>,
}

impl DirectoryService {
    /// Creates a new directory service.
    pub fn new(metadata: Arc<dyn MetadataStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { metadata, storage }
    }

    /// Resolves a virtual path of directory names from the caller's root.
    pub async fn resolve_path(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
    ) -> AppResult<Directory> {
        resolve_directory(self.metadata.as_ref(), ctx, segments).await
    }

    /// Gets a directory owned by the caller.
    pub async fn get(&self, ctx: &RequestContext, dir_id: Uuid) -> AppResult<Directory> {
        self.metadata
            .find_directory(ctx.user_id, dir_id)
            .await?
            .ok_or_else(|| AppError::not_found("Directory not found"))
    }

    /// Lists the direct children of a directory.
    ///
    /// Entries are sorted by name; a directory sorts before a file of the
    /// same name.
    pub async fn list(&self, ctx: &RequestContext, dir_id: Uuid) -> AppResult<Vec<ListingEntry>> {
        let dir = self.get(ctx, dir_id).await?;

        let directories = self
            .metadata
            .find_child_directories(ctx.user_id, dir.id)
            .await?;
        let files = self.metadata.find_child_files(ctx.user_id, dir.id).await?;

        let mut entries: Vec<ListingEntry> = directories
            .iter()
            .map(ListingEntry::from)
            .chain(files.iter().map(ListingEntry::from))
            .collect();
        sort_listing(&mut entries);
        Ok(entries)
    }

    /// Creates a directory under `parent_id`.
    ///
    /// The physical directory is created first; if the row cannot be
    /// inserted it is removed again.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Directory> {
        validate_name(name)?;
        let parent = self.get(ctx, parent_id).await?;

        if self
            .metadata
            .find_child_directory(ctx.user_id, parent.id, name)
            .await?
            .is_some()
        {
            return Err(AppError::validation(format!(
                "A directory named '{name}' already exists here"
            )));
        }

        let id = Uuid::new_v4();
        let key = layout::directory_key(ctx.user_id, id);
        self.storage.create_dir(&key).await?;

        let record = CreateDirectory {
            id,
            name: name.to_string(),
            owner_id: ctx.user_id,
            parent_id: Some(parent.id),
        };
        let dir = match self.metadata.insert_directory(&record).await {
            Ok(dir) => dir,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete_dir(&key).await {
                    warn!(key = %key, error = %cleanup, "Failed to remove orphaned directory");
                }
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            dir_id = %dir.id,
            parent_id = %parent.id,
            name = %dir.name,
            "Directory created"
        );
        Ok(dir)
    }

    /// Deletes a directory and everything below it.
    ///
    /// Works from a snapshot taken at the start: file artifacts, then file
    /// rows, then directory rows from the leaves up, then the physical
    /// directories. Rows already removed by a concurrent delete are skipped.
    pub async fn delete(&self, ctx: &RequestContext, dir_id: Uuid) -> AppResult<DeleteSummary> {
        let dir = self.get(ctx, dir_id).await?;
        if dir.is_root() {
            return Err(AppError::validation("The root directory cannot be deleted"));
        }

        let subtree = self.metadata.find_subtree(ctx.user_id, dir.id).await?;

        for file in &subtree.files {
            let key = layout::file_key(ctx.user_id, file.parent_id, &file.stored_name);
            self.storage.delete(&key).await?;
        }

        let deleted_file_count = self
            .metadata
            .delete_files(ctx.user_id, &subtree.file_ids())
            .await?;
        let deleted_dir_count = self
            .metadata
            .delete_directories(ctx.user_id, &subtree.directory_ids_leaves_first())
            .await?;

        for removed in subtree.directories.iter().rev() {
            let key = layout::directory_key(ctx.user_id, removed.id);
            self.storage.delete_dir(&key).await?;
        }

        info!(
            user_id = %ctx.user_id,
            dir_id = %dir.id,
            deleted_dir_count,
            deleted_file_count,
            "Directory deleted"
        );
        Ok(DeleteSummary {
            deleted_dir_count,
            deleted_file_count,
        })
    }

    /// Renames and/or moves a directory.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        dir_id: Uuid,
        new_name: Option<&str>,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Directory> {
        if new_name.is_none() && new_parent_id.is_none() {
            return Err(AppError::validation(
                "Nothing to update: supply a new name or a new parent",
            ));
        }
        if let Some(name) = new_name {
            validate_name(name)?;
        }

        let dir = self.get(ctx, dir_id).await?;
        if dir.is_root() {
            return Err(AppError::validation(
                "The root directory cannot be renamed or moved",
            ));
        }
        if new_parent_id == Some(dir.id) {
            return Err(AppError::cycle("Cannot move a directory into itself"));
        }

        let update = DirectoryUpdate {
            name: new_name.map(str::to_string),
            parent_id: new_parent_id,
        };
        let updated = self
            .metadata
            .update_directory(ctx.user_id, dir.id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("Directory not found"))?;

        info!(
            user_id = %ctx.user_id,
            dir_id = %updated.id,
            name = %updated.name,
            "Directory updated"
        );
        Ok(updated)
    }
}
