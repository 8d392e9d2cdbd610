//! File repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_entity::file::{CreateFileEntry, FileEntry};

use super::{is_foreign_key_violation, map_write_error};

/// Repository for file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<FileEntry>> {
        sqlx::query_as::<_, FileEntry>("SELECT * FROM files WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find a file in a directory by its original name.
    pub async fn find_by_parent_and_name(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(
            "SELECT * FROM files WHERE owner_id = $1 AND parent_id = $2 AND original_name = $3",
        )
        .bind(owner_id)
        .bind(parent_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file by name", e))
    }

    /// List files in a directory.
    pub async fn find_by_parent(&self, owner_id: Uuid, parent_id: Uuid) -> AppResult<Vec<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(
            "SELECT * FROM files WHERE owner_id = $1 AND parent_id = $2 ORDER BY original_name ASC",
        )
        .bind(owner_id)
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List files in any of the given directories.
    pub async fn find_by_parents(
        &self,
        owner_id: Uuid,
        parent_ids: &[Uuid],
    ) -> AppResult<Vec<FileEntry>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, FileEntry>(
            "SELECT * FROM files WHERE owner_id = $1 AND parent_id = ANY($2)",
        )
        .bind(owner_id)
        .bind(parent_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list subtree files", e))
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateFileEntry) -> AppResult<FileEntry> {
        sqlx::query_as::<_, FileEntry>(
            "INSERT INTO files \
             (id, original_name, stored_name, size_bytes, mime_type, owner_id, parent_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.original_name)
        .bind(&data.stored_name)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .bind(data.owner_id)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found("Parent directory not found")
            } else {
                map_write_error(e, "Failed to create file record")
            }
        })
    }

    /// Rename a file.
    pub async fn rename(
        &self,
        owner_id: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> AppResult<Option<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(
            "UPDATE files SET original_name = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to rename file"))
    }

    /// Delete files by ID. Missing rows are skipped.
    pub async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM files WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner_id)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete files", e))?;
        Ok(result.rows_affected())
    }
}
