//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Human-readable display name.
    pub display_name: String,
    /// Login email, unique case-insensitively.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The user's root directory.
    pub root_dir_id: Uuid,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public view of the user, without credentials.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            root_dir_id: self.root_dir_id,
            created_at: self.created_at,
        }
    }
}

/// Data required to create a user row.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Pre-generated identifier.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Email, already normalized to lowercase.
    pub email: String,
    /// Argon2 hash.
    pub password_hash: String,
    /// Identifier of the root directory created alongside the user.
    pub root_dir_id: Uuid,
}

/// User data safe to return from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Email.
    pub email: String,
    /// Root directory identifier.
    pub root_dir_id: Uuid,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}
