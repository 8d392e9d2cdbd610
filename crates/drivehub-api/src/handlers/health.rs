//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let metadata_ok = state.metadata.health_check().await.unwrap_or(false);
    let storage_ok = state.storage.health_check().await.unwrap_or(false);

    let status = if metadata_ok && storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        metadata: if metadata_ok { "connected" } else { "unavailable" }.to_string(),
        storage: if storage_ok { "available" } else { "unavailable" }.to_string(),
    };

    (status, Json(ApiResponse::ok(body)))
}
