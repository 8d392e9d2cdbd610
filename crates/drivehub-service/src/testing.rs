//! Shared fixtures for service unit tests.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use uuid::Uuid;

use drivehub_core::traits::{ByteStream, StorageProvider};
use drivehub_database::{MemoryMetadataStore, MetadataStore, UserStore};
use drivehub_entity::directory::CreateDirectory;
use drivehub_entity::user::CreateUser;
use drivehub_storage::LocalStorageProvider;
use drivehub_storage::layout;

use crate::context::RequestContext;

pub struct Fixture {
    pub _dir: tempfile::TempDir,
    pub store: Arc<MemoryMetadataStore>,
    pub storage: Arc<LocalStorageProvider>,
}

impl Fixture {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        Self {
            _dir: dir,
            store: Arc::new(MemoryMetadataStore::new()),
            storage: Arc::new(storage),
        }
    }

    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.store.clone()
    }

    pub fn provider(&self) -> Arc<dyn StorageProvider> {
        self.storage.clone()
    }

    /// Register an owner with a root directory and return their context.
    pub async fn owner(&self, email: &str) -> RequestContext {
        let user_id = Uuid::new_v4();
        let root_dir_id = Uuid::new_v4();
        self.store
            .create_user(
                &CreateUser {
                    id: user_id,
                    display_name: email.to_string(),
                    email: email.to_string(),
                    password_hash: "unused".to_string(),
                    root_dir_id,
                },
                &CreateDirectory {
                    id: root_dir_id,
                    name: "root".to_string(),
                    owner_id: user_id,
                    parent_id: None,
                },
            )
            .await
            .unwrap();
        self.storage
            .create_dir(&layout::directory_key(user_id, root_dir_id))
            .await
            .unwrap();
        RequestContext::new(user_id, root_dir_id, email.to_string())
    }
}

pub fn body(parts: Vec<Vec<u8>>) -> ByteStream {
    Box::pin(futures::stream::iter(
        parts
            .into_iter()
            .map(|p| Ok::<_, std::io::Error>(Bytes::from(p))),
    ))
}

pub async fn collect(mut stream: ByteStream) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.unwrap());
    }
    out
}
