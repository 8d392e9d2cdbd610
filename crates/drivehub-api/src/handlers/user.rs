//! User handlers: register, login, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use drivehub_entity::user::UserProfile;
use drivehub_service::{LoginResult, RegisterInput};

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, BearerToken, ValidatedJson};
use crate::state::AppState;

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), ApiError> {
    let profile = state
        .user_service
        .register(RegisterInput {
            display_name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let result = state.user_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /users/logout
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.user_service.logout(&token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Logged out"))))
}

/// GET /users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.user_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(profile)))
}
