//! Request context carrying the authenticated owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// Built by the authentication extractor and passed into service methods so
/// that every operation is scoped to the acting owner's tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID; owner of every row touched.
    pub user_id: Uuid,
    /// The user's root directory.
    pub root_dir_id: Uuid,
    /// The user's email (convenience field from the token).
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, root_dir_id: Uuid, email: String) -> Self {
        Self {
            user_id,
            root_dir_id,
            email,
            request_time: Utc::now(),
        }
    }
}
