//! Directory listing value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::Directory;
use crate::file::FileEntry;

/// One direct child of a directory, as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    /// Identifier of the directory or file row.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Whether the child is a directory.
    pub is_directory: bool,
    /// Size in bytes (files only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Directory> for ListingEntry {
    fn from(dir: &Directory) -> Self {
        Self {
            id: dir.id,
            name: dir.name.clone(),
            is_directory: true,
            size: None,
            created_at: dir.created_at,
        }
    }
}

impl From<&FileEntry> for ListingEntry {
    fn from(file: &FileEntry) -> Self {
        Self {
            id: file.id,
            name: file.original_name.clone(),
            is_directory: false,
            size: Some(file.size_bytes),
            created_at: file.created_at,
        }
    }
}

/// Sort listing entries by name ascending, directories first on equal names.
pub fn sort_listing(entries: &mut [ListingEntry]) {
    entries.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| b.is_directory.cmp(&a.is_directory))
    });
}

/// Summary of a subtree delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    /// Directory rows removed by this call.
    pub deleted_dir_count: u64,
    /// File rows removed by this call.
    pub deleted_file_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, is_directory: bool) -> ListingEntry {
        ListingEntry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_directory,
            size: if is_directory { None } else { Some(1) },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sort_by_name_then_directories_first() {
        let mut entries = vec![
            item("b.txt", false),
            item("a", false),
            item("a", true),
            item("B", true),
        ];
        sort_listing(&mut entries);
        let order: Vec<(&str, bool)> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.is_directory))
            .collect();
        assert_eq!(
            order,
            vec![("B", true), ("a", true), ("a", false), ("b.txt", false)]
        );
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = DeleteSummary {
            deleted_dir_count: 2,
            deleted_file_count: 1,
        };
        let json = serde_json::to_value(summary).expect("serialize");
        assert_eq!(json["deletedDirCount"], 2);
        assert_eq!(json["deletedFileCount"], 1);
    }
}
