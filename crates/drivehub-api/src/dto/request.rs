//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use drivehub_service::DownloadMode;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Plaintext password; policy is checked by the user service.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Directory rename/move request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDirectoryRequest {
    /// New name within the (possibly new) parent.
    #[validate(length(min = 1, message = "New name cannot be empty"))]
    pub new_name: Option<String>,
    /// Virtual path of the new parent, from the caller's root. `""` or `"/"`
    /// names the root itself.
    pub new_parent_path: Option<String>,
}

/// File rename request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileRequest {
    /// New user-visible name.
    #[validate(length(min = 1, message = "New name is required"))]
    pub new_name: String,
}

/// Query parameters for file downloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    /// `open` to display inline, `download` (default) to save.
    pub action: Option<DownloadMode>,
}
