//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use drivehub_entity::file::FileEntry;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Returned after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// New file id.
    pub id: Uuid,
    /// User-visible name.
    pub name: String,
    /// Stored size in bytes.
    pub size: i64,
}

impl From<FileEntry> for UploadResponse {
    fn from(file: FileEntry) -> Self {
        Self {
            id: file.id,
            name: file.original_name,
            size: file.size_bytes,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency is reachable, `"degraded"` otherwise.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Metadata store status.
    pub metadata: String,
    /// Physical storage status.
    pub storage: String,
}
