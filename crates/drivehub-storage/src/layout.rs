//! Physical key layout under the storage root.
//!
//! Every directory row owns one flat physical directory at
//! `<owner>/<dir_id>`, and file artifacts live inside it as
//! `<owner>/<dir_id>/<stored_name>`. The virtual tree shape lives only in the
//! metadata store, so moves and renames never touch the disk.

use uuid::Uuid;

/// Longest extension carried over from the original name.
const MAX_EXTENSION_LEN: usize = 16;

/// Key of the physical directory backing a directory row.
pub fn directory_key(owner_id: Uuid, dir_id: Uuid) -> String {
    format!("{owner_id}/{dir_id}")
}

/// Key of a stored file artifact.
pub fn file_key(owner_id: Uuid, dir_id: Uuid, stored_name: &str) -> String {
    format!("{owner_id}/{dir_id}/{stored_name}")
}

/// Generate a fresh, content-opaque stored name for an upload.
///
/// The lowercase extension of `original_name` is kept when it is short and
/// purely ASCII alphanumeric; anything else is dropped.
pub fn stored_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    let extension = original_name
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_ascii_lowercase()))
        .filter(|(stem, ext)| {
            !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });
    match extension {
        Some((_, ext)) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}
