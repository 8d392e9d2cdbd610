//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use drivehub_core::config::AppConfig;
use drivehub_core::traits::StorageProvider;
use drivehub_database::{MetadataStore, PgMetadataStore};
use drivehub_service::{DirectoryService, FileService, UserService};

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL store, kept so shutdown can close its pool.
    pub pg_store: Option<Arc<PgMetadataStore>>,
    /// Metadata store backing the directory tree.
    pub metadata: Arc<dyn MetadataStore>,
    /// Physical storage provider.
    pub storage: Arc<dyn StorageProvider>,
    /// Directory use cases.
    pub directory_service: Arc<DirectoryService>,
    /// File use cases.
    pub file_service: Arc<FileService>,
    /// Account and token use cases.
    pub user_service: Arc<UserService>,
}
