//! PostgreSQL-backed metadata and user stores.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use drivehub_core::config::DatabaseConfig;
use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_entity::directory::{CreateDirectory, Directory, DirectoryUpdate};
use drivehub_entity::file::{CreateFileEntry, FileEntry};
use drivehub_entity::user::{CreateUser, User};

use crate::repositories::{DirectoryRepository, FileRepository, UserRepository};
use crate::store::{MetadataStore, Subtree, UserStore};

/// Metadata store composed from the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PgMetadataStore {
    pool: PgPool,
    directories: DirectoryRepository,
    files: FileRepository,
    users: UserRepository,
}

impl PgMetadataStore {
    /// Open the pool, bring the schema up to date, and confirm the server
    /// answers before any request is served.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options: PgConnectOptions = config.url.parse().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid database URL", e)
        })?;
        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or_default(),
            max_connections = config.max_connections,
            "Connecting metadata store to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to connect to PostgreSQL", e)
            })?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        if !store.health_check().await? {
            return Err(AppError::database("Metadata store did not answer its health check"));
        }
        Ok(store)
    }

    /// Build the store on an already connected pool. No migrations run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            directories: DirectoryRepository::new(pool.clone()),
            files: FileRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Apply the embedded directory/file/user schema migrations.
    async fn migrate(&self) -> AppResult<()> {
        let migrator = sqlx::migrate!("../../migrations");
        let known = migrator.iter().count();
        migrator.run(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to apply schema migrations", e)
        })?;
        info!(migrations = known, "Metadata schema is up to date");
        Ok(())
    }

    /// Close every pooled connection. Later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Metadata store pool closed");
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn find_directory(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Directory>> {
        self.directories.find_by_id(owner_id, id).await
    }

    async fn find_child_directory(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Directory>> {
        self.directories
            .find_child_by_name(owner_id, parent_id, name)
            .await
    }

    async fn find_child_directories(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<Vec<Directory>> {
        self.directories.find_children(owner_id, parent_id).await
    }

    async fn find_subtree(&self, owner_id: Uuid, root_id: Uuid) -> AppResult<Subtree> {
        let directories = self.directories.find_subtree(owner_id, root_id).await?;
        let ids: Vec<Uuid> = directories.iter().map(|d| d.id).collect();
        let files = self.files.find_by_parents(owner_id, &ids).await?;
        Ok(Subtree { directories, files })
    }

    async fn insert_directory(&self, data: &CreateDirectory) -> AppResult<Directory> {
        self.directories.create(data).await
    }

    async fn update_directory(
        &self,
        owner_id: Uuid,
        id: Uuid,
        update: &DirectoryUpdate,
    ) -> AppResult<Option<Directory>> {
        self.directories.update(owner_id, id, update).await
    }

    async fn delete_directories(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        self.directories.delete_many(owner_id, ids).await
    }

    async fn find_file(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<FileEntry>> {
        self.files.find_by_id(owner_id, id).await
    }

    async fn find_child_file(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<FileEntry>> {
        self.files
            .find_by_parent_and_name(owner_id, parent_id, name)
            .await
    }

    async fn find_child_files(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<Vec<FileEntry>> {
        self.files.find_by_parent(owner_id, parent_id).await
    }

    async fn insert_file(&self, data: &CreateFileEntry) -> AppResult<FileEntry> {
        self.files.create(data).await
    }

    async fn rename_file(
        &self,
        owner_id: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> AppResult<Option<FileEntry>> {
        self.files.rename(owner_id, id, new_name).await
    }

    async fn delete_files(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        self.files.delete_many(owner_id, ids).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

#[async_trait]
impl UserStore for PgMetadataStore {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn create_user(&self, data: &CreateUser, root: &CreateDirectory) -> AppResult<User> {
        self.users.create_with_root(data, root).await
    }
}
