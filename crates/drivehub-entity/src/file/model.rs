//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Unique file identifier.
    pub id: Uuid,
    /// Name shown to the user, unique within the parent directory.
    pub original_name: String,
    /// Name of the physical artifact. Never changes once written.
    #[serde(skip_serializing)]
    pub stored_name: String,
    /// Size of the stored artifact in bytes.
    pub size_bytes: i64,
    /// MIME type guessed from the original name.
    pub mime_type: Option<String>,
    /// The owning user.
    pub owner_id: Uuid,
    /// The directory containing this file.
    pub parent_id: Uuid,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file was last renamed.
    pub updated_at: DateTime<Utc>,
}

impl FileEntry {
    /// Get the extension of the original name (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.original_name
            .rsplit_once('.')
            .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
            .map(|(_, ext)| ext.to_lowercase())
    }
}

/// Data required to create a new file row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileEntry {
    /// Pre-generated identifier.
    pub id: Uuid,
    /// Name shown to the user.
    pub original_name: String,
    /// Name of the physical artifact.
    pub stored_name: String,
    /// Observed size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: Option<String>,
    /// The owning user.
    pub owner_id: Uuid,
    /// The containing directory.
    pub parent_id: Uuid,
}
