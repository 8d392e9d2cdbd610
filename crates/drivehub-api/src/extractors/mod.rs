//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{AuthUser, BearerToken};
pub use json::ValidatedJson;
