//! Directory handlers: list, create, rename/move, delete.
//!
//! The wildcard tail of every route is a virtual path walked from the
//! caller's root directory.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use drivehub_core::error::AppError;
use drivehub_entity::directory::Directory;
use drivehub_entity::listing::{DeleteSummary, ListingEntry};
use drivehub_service::path::split_path;

use crate::dto::request::UpdateDirectoryRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /directory
pub async fn list_root(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ListingEntry>>>, ApiError> {
    let entries = state.directory_service.list(&auth, auth.root_dir_id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// GET /directory/{*path}
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
) -> Result<Json<ApiResponse<Vec<ListingEntry>>>, ApiError> {
    let segments = split_path(&path);
    let dir = state.directory_service.resolve_path(&auth, &segments).await?;
    let entries = state.directory_service.list(&auth, dir.id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// POST /directory/{*path}
///
/// The last segment is the new directory's name; the rest names its parent.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Directory>>), ApiError> {
    let segments = split_path(&path);
    let Some((name, parents)) = segments.split_last() else {
        return Err(AppError::validation("A directory name is required").into());
    };

    let parent = state.directory_service.resolve_path(&auth, parents).await?;
    let dir = state.directory_service.create(&auth, parent.id, name).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(dir))))
}

/// PATCH /directory/{*path}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateDirectoryRequest>,
) -> Result<Json<ApiResponse<Directory>>, ApiError> {
    let segments = split_path(&path);
    let dir = state.directory_service.resolve_path(&auth, &segments).await?;

    let new_parent_id = match req.new_parent_path.as_deref() {
        Some(parent_path) => {
            let parent_segments = split_path(parent_path);
            let parent = state
                .directory_service
                .resolve_path(&auth, &parent_segments)
                .await?;
            Some(parent.id)
        }
        None => None,
    };

    let updated = state
        .directory_service
        .update(&auth, dir.id, req.new_name.as_deref(), new_parent_id)
        .await?;

    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /directory/{*path}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
) -> Result<Json<ApiResponse<DeleteSummary>>, ApiError> {
    let segments = split_path(&path);
    let dir = state.directory_service.resolve_path(&auth, &segments).await?;
    let summary = state.directory_service.delete(&auth, dir.id).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
