//! File handlers: upload, download, rename, delete.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use futures::TryStreamExt;

use drivehub_core::error::AppError;
use drivehub_core::traits::ByteStream;
use drivehub_entity::file::FileEntry;
use drivehub_service::path::split_path;

use crate::dto::request::{DownloadQuery, RenameFileRequest};
use crate::dto::response::{ApiResponse, MessageResponse, UploadResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /files/{*path}
///
/// The request body is the raw file content. The last path segment is the
/// file name; the rest names the target directory.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), ApiError> {
    let segments = split_path(&path);
    let Some((name, parents)) = segments.split_last() else {
        return Err(AppError::validation("A file name is required").into());
    };

    let max = state.config.storage.max_upload_size_bytes;
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > max) {
        return Err(AppError::payload_too_large(format!(
            "Upload exceeds the {max} byte limit"
        ))
        .into());
    }

    let parent = state.directory_service.resolve_path(&auth, parents).await?;
    let content: ByteStream = Box::pin(body.into_data_stream().map_err(std::io::Error::other));
    let file = state
        .file_service
        .upload(&auth, parent.id, name, content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UploadResponse::from(file))),
    ))
}

/// GET /files/{*path}?action=open|download
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let segments = split_path(&path);
    let file = state.file_service.resolve_path(&auth, &segments).await?;
    let download = state
        .file_service
        .download(&auth, file.id, query.action.unwrap_or_default())
        .await?;

    let headers = [
        (header::CONTENT_TYPE, download.content_type.clone()),
        (header::CONTENT_LENGTH, download.size.to_string()),
        (header::CONTENT_DISPOSITION, download.content_disposition()),
    ];

    Ok((headers, Body::from_stream(download.stream)))
}

/// PATCH /files/{*path}
pub async fn rename(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
    ValidatedJson(req): ValidatedJson<RenameFileRequest>,
) -> Result<Json<ApiResponse<FileEntry>>, ApiError> {
    let segments = split_path(&path);
    let file = state.file_service.resolve_path(&auth, &segments).await?;
    let renamed = state
        .file_service
        .rename(&auth, file.id, &req.new_name)
        .await?;
    Ok(Json(ApiResponse::ok(renamed)))
}

/// DELETE /files/{*path}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let segments = split_path(&path);
    let file = state.file_service.resolve_path(&auth, &segments).await?;
    state.file_service.delete(&auth, file.id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("File deleted"))))
}
