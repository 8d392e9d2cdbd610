//! Route definitions for the DriveHub HTTP API.
//!
//! Routes are organized by domain and merged into one router. The router
//! receives `AppState` and passes it to all handlers via Axum's `State`
//! extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Body limit for JSON endpoints.
const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(directory_routes())
        .merge(file_routes())
        .merge(user_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Directory listing, creation, rename/move, and subtree delete
fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/directory", get(handlers::directory::list_root))
        .route(
            "/directory/{*path}",
            get(handlers::directory::list)
                .post(handlers::directory::create)
                .patch(handlers::directory::update)
                .delete(handlers::directory::delete),
        )
        .layer(RequestBodyLimitLayer::new(JSON_BODY_LIMIT))
}

/// File upload, download, rename, and delete
///
/// Upload size is enforced while streaming, so the default body limit is
/// lifted here.
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files/{*path}",
            get(handlers::file::download)
                .post(handlers::file::upload)
                .patch(handlers::file::rename)
                .delete(handlers::file::delete),
        )
        .layer(DefaultBodyLimit::disable())
}

/// Account endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(handlers::user::register))
        .route("/users/login", post(handlers::user::login))
        .route("/users/logout", post(handlers::user::logout))
        .route("/users/me", get(handlers::user::me))
        .layer(RequestBodyLimitLayer::new(JSON_BODY_LIMIT))
}

/// Liveness and dependency health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
