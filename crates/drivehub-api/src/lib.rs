//! # drivehub-api
//!
//! HTTP API layer for DriveHub built on Axum.
//!
//! Provides the REST endpoints for directories, files, and user accounts,
//! the bearer-token extractor, CORS and request logging middleware, DTOs,
//! and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
