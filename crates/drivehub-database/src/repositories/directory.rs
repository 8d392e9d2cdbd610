//! Directory repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_entity::directory::{CreateDirectory, Directory, DirectoryUpdate};

use super::{is_foreign_key_violation, map_write_error};

/// Repository for directory rows and tree queries.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a directory by ID.
    pub async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Directory>> {
        sqlx::query_as::<_, Directory>(
            "SELECT * FROM directories WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find directory", e))
    }

    /// Find a direct child directory by name.
    pub async fn find_child_by_name(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Directory>> {
        sqlx::query_as::<_, Directory>(
            "SELECT * FROM directories WHERE owner_id = $1 AND parent_id = $2 AND name = $3",
        )
        .bind(owner_id)
        .bind(parent_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find directory by name", e)
        })
    }

    /// List direct children of a directory.
    pub async fn find_children(&self, owner_id: Uuid, parent_id: Uuid) -> AppResult<Vec<Directory>> {
        sqlx::query_as::<_, Directory>(
            "SELECT * FROM directories WHERE owner_id = $1 AND parent_id = $2 ORDER BY name ASC",
        )
        .bind(owner_id)
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Recursive query returning a directory and all of its descendants,
    /// parents before children.
    pub async fn find_subtree(&self, owner_id: Uuid, root_id: Uuid) -> AppResult<Vec<Directory>> {
        sqlx::query_as::<_, Directory>(
            "WITH RECURSIVE tree AS ( \
                SELECT d.*, 0 AS depth FROM directories d \
                WHERE d.id = $2 AND d.owner_id = $1 \
                UNION ALL \
                SELECT d.*, t.depth + 1 FROM directories d \
                INNER JOIN tree t ON d.parent_id = t.id \
                WHERE d.owner_id = $1 \
             ) SELECT id, name, owner_id, parent_id, created_at, updated_at \
               FROM tree ORDER BY depth ASC, name ASC",
        )
        .bind(owner_id)
        .bind(root_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list subtree", e))
    }

    /// Create a new directory.
    pub async fn create(&self, data: &CreateDirectory) -> AppResult<Directory> {
        sqlx::query_as::<_, Directory>(
            "INSERT INTO directories (id, name, owner_id, parent_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(data.owner_id)
        .bind(data.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found("Parent directory not found")
            } else {
                map_write_error(e, "Failed to create directory")
            }
        })
    }

    /// Rename and/or move a directory.
    ///
    /// Moves by the same owner are serialized with a transaction-scoped
    /// advisory lock, so the ancestor check below cannot race another move.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        update: &DirectoryUpdate,
    ) -> AppResult<Option<Directory>> {
        let db_err =
            |e: sqlx::Error| AppError::with_source(ErrorKind::Database, "Failed to update directory", e);

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM directories WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        if existing.is_none() {
            return Ok(None);
        }

        if let Some(new_parent_id) = update.parent_id {
            let chain: Vec<Uuid> = sqlx::query_scalar(
                "WITH RECURSIVE chain AS ( \
                    SELECT id, parent_id, 0 AS depth FROM directories \
                    WHERE id = $2 AND owner_id = $1 \
                    UNION ALL \
                    SELECT d.id, d.parent_id, c.depth + 1 FROM directories d \
                    INNER JOIN chain c ON d.id = c.parent_id \
                    WHERE d.owner_id = $1 \
                 ) SELECT id FROM chain ORDER BY depth ASC",
            )
            .bind(owner_id)
            .bind(new_parent_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_err)?;

            if chain.is_empty() {
                return Err(AppError::not_found("Destination directory not found"));
            }
            if chain.contains(&id) {
                return Err(AppError::cycle(
                    "Cannot move a directory into itself or one of its descendants",
                ));
            }
        }

        let updated = sqlx::query_as::<_, Directory>(
            "UPDATE directories \
             SET name = COALESCE($3, name), parent_id = COALESCE($4, parent_id), updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .bind(update.name.as_deref())
        .bind(update.parent_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update directory"))?;

        tx.commit().await.map_err(db_err)?;
        Ok(Some(updated))
    }

    /// Delete directories by ID. Missing rows are skipped.
    pub async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM directories WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner_id)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::validation("Directory contents changed during delete; retry")
                } else {
                    AppError::with_source(ErrorKind::Database, "Failed to delete directories", e)
                }
            })?;
        Ok(result.rows_affected())
    }
}
