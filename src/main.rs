//! DriveHub Server: personal file storage over HTTP.
//!
//! Main entry point that loads configuration, initializes logging, and
//! hands off to the API crate.

use tracing_subscriber::{EnvFilter, fmt};

use drivehub_api::{build_state, run_server};
use drivehub_core::config::AppConfig;
use drivehub_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("DRIVEHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, &env).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig, env: &str) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %env,
        provider = ?config.database.provider,
        storage_root = %config.storage.root_path,
        "Starting DriveHub"
    );

    let state = build_state(config).await?;
    run_server(state).await
}
