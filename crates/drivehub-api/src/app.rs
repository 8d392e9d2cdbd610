//! Application builder: wires stores, services, and the router into a
//! running server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tracing::{info, warn};

use drivehub_auth::jwt::{JwtDecoder, JwtEncoder};
use drivehub_auth::password::{PasswordHasher, PasswordValidator};
use drivehub_cache::CacheManager;
use drivehub_core::config::{AppConfig, DatabaseProvider};
use drivehub_core::error::AppError;
use drivehub_core::traits::StorageProvider;
use drivehub_database::{MemoryMetadataStore, MetadataStore, PgMetadataStore, UserStore};
use drivehub_service::{DirectoryService, FileService, UserService};
use drivehub_storage::LocalStorageProvider;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Constructs every store and service from configuration.
///
/// With the postgres provider this connects, runs migrations, and checks
/// connectivity before returning. Interrupted uploads are swept from the
/// storage root when enabled.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    // ── Step 1: Physical storage ─────────────────────────────────
    let local = LocalStorageProvider::new(&config.storage.root_path).await?;
    if config.storage.sweep_partial_on_startup {
        let removed = local.sweep_partials().await?;
        if removed > 0 {
            warn!(removed, "Removed partial uploads left by a previous run");
        }
    }
    let storage: Arc<dyn StorageProvider> = Arc::new(local);

    // ── Step 2: Metadata store ───────────────────────────────────
    let (pg_store, metadata, users): (
        Option<Arc<PgMetadataStore>>,
        Arc<dyn MetadataStore>,
        Arc<dyn UserStore>,
    ) = match config.database.provider {
        DatabaseProvider::Postgres => {
            let store = Arc::new(PgMetadataStore::connect(&config.database).await?);
            (Some(store.clone()), store.clone(), store)
        }
        DatabaseProvider::Memory => {
            warn!("Using the in-memory metadata store; data is lost on exit");
            let store = Arc::new(MemoryMetadataStore::new());
            (None, store.clone(), store)
        }
    };

    // ── Step 3: Cache and auth ───────────────────────────────────
    let cache = Arc::new(CacheManager::new(&config.cache));
    let password_hasher = Arc::new(PasswordHasher::new());
    let password_validator = Arc::new(PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth, Arc::clone(&cache)));

    // ── Step 4: Services ─────────────────────────────────────────
    let directory_service = Arc::new(DirectoryService::new(
        Arc::clone(&metadata),
        Arc::clone(&storage),
    ));
    let file_service = Arc::new(FileService::new(
        Arc::clone(&metadata),
        Arc::clone(&storage),
        config.storage.max_upload_size_bytes,
    ));
    let user_service = Arc::new(UserService::new(
        users,
        Arc::clone(&storage),
        password_hasher,
        password_validator,
        jwt_encoder,
        jwt_decoder,
    ));

    Ok(AppState {
        config: Arc::new(config),
        pg_store,
        metadata,
        storage,
        directory_service,
        file_service,
        user_service,
    })
}

/// Serves the application until Ctrl-C or SIGTERM, then closes the pool.
///
/// In-flight requests get `shutdown_grace_seconds` to finish once a signal
/// arrives.
pub async fn run_server(state: AppState) -> Result<(), AppError> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let pg_store = state.pg_store.clone();

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "DriveHub server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    let mut server = std::pin::pin!(server);

    let result = tokio::select! {
        result = &mut server => result,
        _ = async { let _ = shutdown_rx.wait_for(|stopping| *stopping).await; } => {
            info!(grace_seconds = grace.as_secs(), "Draining in-flight requests");
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(grace_seconds = grace.as_secs(), "Shutdown grace period elapsed");
                    Ok(())
                }
            }
        }
    };

    if let Some(store) = pg_store {
        store.close().await;
    }
    info!("DriveHub server stopped");

    result.map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
