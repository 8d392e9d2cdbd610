//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_entity::directory::CreateDirectory;
use drivehub_entity::user::{CreateUser, User};

use super::map_write_error;

/// Repository for user rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Insert a user and their root directory in one transaction.
    pub async fn create_with_root(&self, data: &CreateUser, root: &CreateDirectory) -> AppResult<User> {
        let db_err =
            |e: sqlx::Error| AppError::with_source(ErrorKind::Database, "Failed to create user", e);

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, display_name, email, password_hash, root_dir_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.display_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.root_dir_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))?;

        sqlx::query("INSERT INTO directories (id, name, owner_id, parent_id) VALUES ($1, $2, $3, NULL)")
            .bind(root.id)
            .bind(&root.name)
            .bind(root.owner_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "Failed to create root directory"))?;

        tx.commit().await.map_err(db_err)?;
        Ok(user)
    }
}
