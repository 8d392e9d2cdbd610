//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use drivehub_core::error::{AppError, ErrorKind};

/// Message returned for every server-side failure.
const GENERIC_SERVER_MESSAGE: &str = "An internal error occurred";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP-facing wrapper around [`AppError`].
///
/// Handlers return `Result<_, ApiError>` and use `?` on service calls.
#[derive(Debug)]
pub struct ApiError {
    /// The underlying domain error.
    pub inner: AppError,
    /// Field-level details for validation failures.
    pub details: Option<serde_json::Value>,
}

impl From<AppError> for ApiError {
    fn from(inner: AppError) -> Self {
        Self {
            inner,
            details: None,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            inner: AppError::validation("Request body failed validation"),
            details: serde_json::to_value(errors.field_errors()).ok(),
        }
    }
}

/// HTTP status and error code for a kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::PathTraversal => (StatusCode::BAD_REQUEST, "PATH_TRAVERSAL"),
        ErrorKind::Cycle => (StatusCode::BAD_REQUEST, "CYCLE"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = status_for(self.inner.kind);

        let message = if self.inner.kind.is_server_error() {
            tracing::error!(
                kind = %self.inner.kind,
                error = %self.inner.message,
                source = ?self.inner.source,
                "Internal server error"
            );
            GENERIC_SERVER_MESSAGE.to_string()
        } else {
            self.inner.message
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details: self.details,
        };

        (status, Json(body)).into_response()
    }
}
