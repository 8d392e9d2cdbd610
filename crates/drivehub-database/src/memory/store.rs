//! In-memory metadata store using a Tokio `RwLock`.
//!
//! Uniqueness and cycle checks run under the write lock together with the
//! mutation they guard, which gives the same guarantees as the PostgreSQL
//! constraints on a single node.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_entity::directory::{CreateDirectory, Directory, DirectoryUpdate};
use drivehub_entity::file::{CreateFileEntry, FileEntry};
use drivehub_entity::user::{CreateUser, User};

use crate::store::{MetadataStore, Subtree, UserStore};

#[derive(Debug, Default)]
struct InnerState {
    directories: HashMap<Uuid, Directory>,
    files: HashMap<Uuid, FileEntry>,
    users: HashMap<Uuid, User>,
}

impl InnerState {
    fn directory(&self, owner_id: Uuid, id: Uuid) -> Option<&Directory> {
        self.directories.get(&id).filter(|d| d.owner_id == owner_id)
    }

    fn file(&self, owner_id: Uuid, id: Uuid) -> Option<&FileEntry> {
        self.files.get(&id).filter(|f| f.owner_id == owner_id)
    }

    fn directory_name_taken(&self, owner_id: Uuid, parent_id: Uuid, name: &str, except: Uuid) -> bool {
        self.directories.values().any(|d| {
            d.owner_id == owner_id && d.parent_id == Some(parent_id) && d.name == name && d.id != except
        })
    }

    fn file_name_taken(&self, owner_id: Uuid, parent_id: Uuid, name: &str, except: Uuid) -> bool {
        self.files.values().any(|f| {
            f.owner_id == owner_id
                && f.parent_id == parent_id
                && f.original_name == name
                && f.id != except
        })
    }

    fn children_of(&self, owner_id: Uuid, parent_id: Uuid) -> Vec<&Directory> {
        let mut children: Vec<&Directory> = self
            .directories
            .values()
            .filter(|d| d.owner_id == owner_id && d.parent_id == Some(parent_id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Ids from `id` up to the owner's root, inclusive.
    fn ancestor_chain(&self, owner_id: Uuid, id: Uuid) -> Vec<Uuid> {
        let mut chain = Vec::new();
        let mut cursor = self.directory(owner_id, id);
        while let Some(dir) = cursor {
            if chain.contains(&dir.id) {
                break;
            }
            chain.push(dir.id);
            cursor = dir.parent_id.and_then(|p| self.directory(owner_id, p));
        }
        chain
    }
}

/// Metadata and user store held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryMetadataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn find_directory(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Directory>> {
        let state = self.state.read().await;
        Ok(state.directory(owner_id, id).cloned())
    }

    async fn find_child_directory(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Directory>> {
        let state = self.state.read().await;
        Ok(state
            .directories
            .values()
            .find(|d| d.owner_id == owner_id && d.parent_id == Some(parent_id) && d.name == name)
            .cloned())
    }

    async fn find_child_directories(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<Vec<Directory>> {
        let state = self.state.read().await;
        Ok(state
            .children_of(owner_id, parent_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn find_subtree(&self, owner_id: Uuid, root_id: Uuid) -> AppResult<Subtree> {
        let state = self.state.read().await;
        let Some(root) = state.directory(owner_id, root_id) else {
            return Ok(Subtree::default());
        };

        let mut directories = vec![root.clone()];
        let mut queue = VecDeque::from([root_id]);
        while let Some(id) = queue.pop_front() {
            for child in state.children_of(owner_id, id) {
                queue.push_back(child.id);
                directories.push(child.clone());
            }
        }

        let files = state
            .files
            .values()
            .filter(|f| f.owner_id == owner_id && directories.iter().any(|d| d.id == f.parent_id))
            .cloned()
            .collect();

        Ok(Subtree { directories, files })
    }

    async fn insert_directory(&self, data: &CreateDirectory) -> AppResult<Directory> {
        let mut state = self.state.write().await;

        if let Some(parent_id) = data.parent_id {
            if state.directory(data.owner_id, parent_id).is_none() {
                return Err(AppError::not_found("Parent directory not found"));
            }
            if state.directory_name_taken(data.owner_id, parent_id, &data.name, data.id) {
                return Err(AppError::validation(
                    "A directory with that name already exists here",
                ));
            }
        }

        let now = Utc::now();
        let dir = Directory {
            id: data.id,
            name: data.name.clone(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            created_at: now,
            updated_at: now,
        };
        state.directories.insert(dir.id, dir.clone());
        Ok(dir)
    }

    async fn update_directory(
        &self,
        owner_id: Uuid,
        id: Uuid,
        update: &DirectoryUpdate,
    ) -> AppResult<Option<Directory>> {
        let mut state = self.state.write().await;

        let Some(current) = state.directory(owner_id, id).cloned() else {
            return Ok(None);
        };

        if let Some(new_parent_id) = update.parent_id {
            let chain = state.ancestor_chain(owner_id, new_parent_id);
            if chain.is_empty() {
                return Err(AppError::not_found("Destination directory not found"));
            }
            if chain.contains(&id) {
                return Err(AppError::cycle(
                    "Cannot move a directory into itself or one of its descendants",
                ));
            }
        }

        let name = update.name.clone().unwrap_or_else(|| current.name.clone());
        let parent_id = update.parent_id.or(current.parent_id);
        if let Some(parent_id) = parent_id {
            if state.directory_name_taken(owner_id, parent_id, &name, id) {
                return Err(AppError::validation(
                    "A directory with that name already exists here",
                ));
            }
        }

        let updated = Directory {
            name,
            parent_id,
            updated_at: Utc::now(),
            ..current
        };
        state.directories.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_directories(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        let mut state = self.state.write().await;

        let has_foreign_child = state.directories.values().any(|d| {
            d.parent_id.is_some_and(|p| ids.contains(&p)) && !ids.contains(&d.id)
        }) || state.files.values().any(|f| ids.contains(&f.parent_id));
        if has_foreign_child {
            return Err(AppError::validation(
                "Directory contents changed during delete; retry",
            ));
        }

        let mut removed = 0;
        for id in ids {
            if state.directory(owner_id, *id).is_some() {
                state.directories.remove(id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn find_file(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<FileEntry>> {
        let state = self.state.read().await;
        Ok(state.file(owner_id, id).cloned())
    }

    async fn find_child_file(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<FileEntry>> {
        let state = self.state.read().await;
        Ok(state
            .files
            .values()
            .find(|f| f.owner_id == owner_id && f.parent_id == parent_id && f.original_name == name)
            .cloned())
    }

    async fn find_child_files(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<Vec<FileEntry>> {
        let state = self.state.read().await;
        let mut files: Vec<FileEntry> = state
            .files
            .values()
            .filter(|f| f.owner_id == owner_id && f.parent_id == parent_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| a.original_name.cmp(&b.original_name));
        Ok(files)
    }

    async fn insert_file(&self, data: &CreateFileEntry) -> AppResult<FileEntry> {
        let mut state = self.state.write().await;

        if state.directory(data.owner_id, data.parent_id).is_none() {
            return Err(AppError::not_found("Parent directory not found"));
        }
        if state.file_name_taken(data.owner_id, data.parent_id, &data.original_name, data.id) {
            return Err(AppError::validation(
                "A file with that name already exists here",
            ));
        }

        let now = Utc::now();
        let file = FileEntry {
            id: data.id,
            original_name: data.original_name.clone(),
            stored_name: data.stored_name.clone(),
            size_bytes: data.size_bytes,
            mime_type: data.mime_type.clone(),
            owner_id: data.owner_id,
            parent_id: data.parent_id,
            created_at: now,
            updated_at: now,
        };
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn rename_file(
        &self,
        owner_id: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> AppResult<Option<FileEntry>> {
        let mut state = self.state.write().await;

        let Some(current) = state.file(owner_id, id).cloned() else {
            return Ok(None);
        };
        if state.file_name_taken(owner_id, current.parent_id, new_name, id) {
            return Err(AppError::validation(
                "A file with that name already exists here",
            ));
        }

        let updated = FileEntry {
            original_name: new_name.to_string(),
            updated_at: Utc::now(),
            ..current
        };
        state.files.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_files(&self, owner_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut removed = 0;
        for id in ids {
            if state.file(owner_id, *id).is_some() {
                state.files.remove(id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryMetadataStore {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, data: &CreateUser, root: &CreateDirectory) -> AppResult<User> {
        let mut state = self.state.write().await;

        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::validation("Email is already registered"));
        }

        let now = Utc::now();
        let user = User {
            id: data.id,
            display_name: data.display_name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            root_dir_id: data.root_dir_id,
            created_at: now,
        };
        state.users.insert(user.id, user.clone());
        state.directories.insert(
            root.id,
            Directory {
                id: root.id,
                name: root.name.clone(),
                owner_id: root.owner_id,
                parent_id: None,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivehub_core::error::ErrorKind;

    async fn seeded() -> (MemoryMetadataStore, Uuid, Uuid) {
        let store = MemoryMetadataStore::new();
        let owner = Uuid::new_v4();
        let root = Uuid::new_v4();
        store
            .create_user(
                &CreateUser {
                    id: owner,
                    display_name: "Owner".into(),
                    email: "owner@example.com".into(),
                    password_hash: "hash".into(),
                    root_dir_id: root,
                },
                &CreateDirectory {
                    id: root,
                    name: "root".into(),
                    owner_id: owner,
                    parent_id: None,
                },
            )
            .await
            .unwrap();
        (store, owner, root)
    }

    async fn mkdir(store: &MemoryMetadataStore, owner: Uuid, parent: Uuid, name: &str) -> Directory {
        store
            .insert_directory(&CreateDirectory {
                id: Uuid::new_v4(),
                name: name.into(),
                owner_id: owner,
                parent_id: Some(parent),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sibling_name_collision_is_validation_error() {
        let (store, owner, root) = seeded().await;
        mkdir(&store, owner, root, "docs").await;

        let err = store
            .insert_directory(&CreateDirectory {
                id: Uuid::new_v4(),
                name: "docs".into(),
                owner_id: owner,
                parent_id: Some(root),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_other_owner_rows_are_invisible() {
        let (store, owner, root) = seeded().await;
        let docs = mkdir(&store, owner, root, "docs").await;

        let stranger = Uuid::new_v4();
        assert!(store.find_directory(stranger, docs.id).await.unwrap().is_none());
        assert!(store.find_child_directories(stranger, root).await.unwrap().is_empty());
        assert_eq!(store.delete_directories(stranger, &[docs.id]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_move_into_descendant_is_cycle() {
        let (store, owner, root) = seeded().await;
        let a = mkdir(&store, owner, root, "a").await;
        let b = mkdir(&store, owner, a.id, "b").await;

        let update = DirectoryUpdate {
            name: None,
            parent_id: Some(b.id),
        };
        let err = store.update_directory(owner, a.id, &update).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cycle);

        let onto_self = DirectoryUpdate {
            name: None,
            parent_id: Some(a.id),
        };
        let err = store.update_directory(owner, a.id, &onto_self).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cycle);
    }

    #[tokio::test]
    async fn test_subtree_is_parents_first() {
        let (store, owner, root) = seeded().await;
        let a = mkdir(&store, owner, root, "a").await;
        let b = mkdir(&store, owner, a.id, "b").await;
        let c = mkdir(&store, owner, b.id, "c").await;

        let subtree = store.find_subtree(owner, a.id).await.unwrap();
        let ids: Vec<Uuid> = subtree.directories.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
        assert_eq!(subtree.directory_ids_leaves_first(), vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_delete_many_skips_missing_rows() {
        let (store, owner, root) = seeded().await;
        let a = mkdir(&store, owner, root, "a").await;

        assert_eq!(store.delete_directories(owner, &[a.id]).await.unwrap(), 1);
        assert_eq!(store.delete_directories(owner, &[a.id]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_files_skips_removed_ids() {
        let (store, owner, root) = seeded().await;
        let mut ids = Vec::new();
        for name in ["a.txt", "b.txt"] {
            let entry = store
                .insert_file(&CreateFileEntry {
                    id: Uuid::new_v4(),
                    original_name: name.into(),
                    stored_name: format!("{}.txt", Uuid::new_v4()),
                    size_bytes: 1,
                    mime_type: None,
                    owner_id: owner,
                    parent_id: root,
                })
                .await
                .unwrap();
            ids.push(entry.id);
        }

        assert_eq!(store.delete_files(owner, &ids[..1]).await.unwrap(), 1);
        assert_eq!(store.delete_files(owner, &ids).await.unwrap(), 1);
        assert_eq!(store.delete_files(owner, &ids).await.unwrap(), 0);
        assert!(store.find_child_files(owner, root).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_case_insensitively() {
        let (store, _, _) = seeded().await;
        let id = Uuid::new_v4();
        let root = Uuid::new_v4();
        let err = store
            .create_user(
                &CreateUser {
                    id,
                    display_name: "Again".into(),
                    email: "OWNER@example.com".into(),
                    password_hash: "hash".into(),
                    root_dir_id: root,
                },
                &CreateDirectory {
                    id: root,
                    name: "root".into(),
                    owner_id: id,
                    parent_id: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
