//! Metadata store traits.
//!
//! Every call is scoped by `owner_id`: rows belonging to another owner are
//! indistinguishable from missing rows.

use async_trait::async_trait;
use uuid::Uuid;

use drivehub_core::result::AppResult;
use drivehub_entity::directory::{CreateDirectory, Directory, DirectoryUpdate};
use drivehub_entity::file::{CreateFileEntry, FileEntry};
use drivehub_entity::user::{CreateUser, User};

/// Snapshot of a directory subtree taken at a single point in time.
#[derive(Debug, Clone, Default)]
pub struct Subtree {
    /// The subtree root followed by its descendants, parents before children.
    pub directories: Vec<Directory>,
    /// Every file whose parent is one of `directories`.
    pub files: Vec<FileEntry>,
}

impl Subtree {
    /// Directory ids ordered leaves first, suitable for deleting rows.
    pub fn directory_ids_leaves_first(&self) -> Vec<Uuid> {
        self.directories.iter().rev().map(|d| d.id).collect()
    }

    /// File ids in the subtree.
    pub fn file_ids(&self) -> Vec<Uuid> {
        self.files.iter().map(|f| f.id).collect()
    }
}

/// Persistence for the directory/file metadata tree.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a directory by id.
    async fn find_directory(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Directory>>;

    /// Find a direct child directory of `parent_id` by name.
    async fn find_child_directory(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Directory>>;

    /// List direct child directories of `parent_id`.
    async fn find_child_directories(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<Vec<Directory>>;

    /// Snapshot a directory and all of its descendants.
    ///
    /// Returns an empty subtree when `root_id` does not exist.
    async fn find_subtree(&self, owner_id: Uuid, root_id: Uuid) -> AppResult<Subtree>;

    /// Insert a directory row.
    ///
    /// Fails with a validation error when a sibling directory already has
    /// the same name.
    async fn insert_directory(&self, data: &CreateDirectory) -> AppResult<Directory>;

    /// Rename and/or move a directory.
    ///
    /// Returns `None` when the directory does not exist. A missing
    /// destination parent is a not-found error, a name collision at the
    /// destination is a validation error, and a destination inside the
    /// directory's own subtree is a cycle error. The cycle check and the
    /// write happen atomically with respect to other moves by the same owner.
    async fn update_directory(
        &self,
        owner_id: Uuid,
        id: Uuid,
        update: &DirectoryUpdate,
    ) -> AppResult<Option<Directory>>;

    /// Delete directory rows by id, returning how many were actually removed.
    ///
    /// Ids that no longer exist are skipped.
    async fn delete_directories(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64>;

    /// Find a file by id.
    async fn find_file(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<FileEntry>>;

    /// Find a file in `parent_id` by its original name.
    async fn find_child_file(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<FileEntry>>;

    /// List files directly inside `parent_id`.
    async fn find_child_files(&self, owner_id: Uuid, parent_id: Uuid)
    -> AppResult<Vec<FileEntry>>;

    /// Insert a file row.
    ///
    /// Fails with a validation error when a sibling file already has the
    /// same original name, or not-found when the parent no longer exists.
    async fn insert_file(&self, data: &CreateFileEntry) -> AppResult<FileEntry>;

    /// Change a file's original name. Returns `None` when the file does not exist.
    async fn rename_file(
        &self,
        owner_id: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> AppResult<Option<FileEntry>>;

    /// Delete file rows by id, returning how many were actually removed.
    async fn delete_files(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64>;

    /// Delete a single file row. Returns whether a row was removed.
    async fn delete_file(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool> {
        Ok(self.delete_files(owner_id, &[id]).await? > 0)
    }

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Persistence for registered users.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by id.
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a user together with their root directory row.
    ///
    /// Fails with a validation error when the email is already registered.
    async fn create_user(&self, data: &CreateUser, root: &CreateDirectory) -> AppResult<User>;
}
