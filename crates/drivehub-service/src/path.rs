//! Name validation and virtual path walking.
//!
//! Virtual paths name entries in an owner's metadata tree, not locations on
//! disk. They are walked one name at a time from the owner's root directory.

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_database::MetadataStore;
use drivehub_entity::directory::Directory;

use crate::context::RequestContext;

/// Longest accepted entry name, in bytes.
pub const MAX_NAME_BYTES: usize = 255;

/// Validate a directory or file name.
///
/// Names must be non-empty, must not be `.` or `..`, must not contain a
/// path separator or NUL, and must fit in [`MAX_NAME_BYTES`].
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation(format!("'{name}' is not a valid name")));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(AppError::validation(
            "Name cannot contain path separators or NUL",
        ));
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(AppError::validation(format!(
            "Name cannot exceed {MAX_NAME_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Split a `/`-separated virtual path into names, dropping empty segments.
pub fn split_path(raw: &str) -> Vec<&str> {
    raw.split('/').filter(|s| !s.is_empty()).collect()
}

/// Walk `segments` from the caller's root directory.
///
/// Every segment must be a valid name; a missing step is not-found.
pub async fn resolve_directory(
    metadata: &dyn MetadataStore,
    ctx: &RequestContext,
    segments: &[&str],
) -> AppResult<Directory> {
    let mut current = metadata
        .find_directory(ctx.user_id, ctx.root_dir_id)
        .await?
        .ok_or_else(|| AppError::not_found("Root directory not found"))?;

    for segment in segments {
        validate_name(segment)?;
        current = metadata
            .find_child_directory(ctx.user_id, current.id, segment)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Directory '{segment}' not found")))?;
    }

    Ok(current)
}
