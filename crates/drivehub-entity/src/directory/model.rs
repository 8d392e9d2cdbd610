//! Directory entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A node in an owner's virtual directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    /// Unique directory identifier.
    pub id: Uuid,
    /// Directory name, unique among its siblings.
    pub name: String,
    /// The owning user.
    pub owner_id: Uuid,
    /// Parent directory (null only for the owner's root).
    pub parent_id: Option<Uuid>,
    /// When the directory was created.
    pub created_at: DateTime<Utc>,
    /// When the directory was last renamed or moved.
    pub updated_at: DateTime<Utc>,
}

impl Directory {
    /// Check if this is the owner's root directory.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new directory row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDirectory {
    /// Pre-generated identifier, so the physical directory can be created
    /// before the row exists.
    pub id: Uuid,
    /// Directory name.
    pub name: String,
    /// The owning user.
    pub owner_id: Uuid,
    /// Parent directory (None for the owner's root).
    pub parent_id: Option<Uuid>,
}

/// Fields that may change on an existing directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryUpdate {
    /// New name, if renaming.
    pub name: Option<String>,
    /// New parent, if moving.
    pub parent_id: Option<Uuid>,
}

impl DirectoryUpdate {
    /// Whether the update changes anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}
