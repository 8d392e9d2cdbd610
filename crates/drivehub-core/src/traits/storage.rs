//! Storage provider trait for the physical side of the file tree.
//!
//! Keys are `/`-separated paths relative to the provider's root. Every
//! implementation must route them through a traversal-checked resolver
//! before touching the backing store.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for physical file storage backends.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Open a stored object and return its byte stream together with its size.
    async fn read(&self, key: &str) -> AppResult<(ByteStream, u64)>;

    /// Write a byte stream to `key`, returning the number of bytes written.
    ///
    /// The object only becomes visible at `key` once the stream has been
    /// fully consumed. When `limit` is set and the stream yields more bytes,
    /// the write fails with a payload-too-large error. On any failure,
    /// including the returned future being dropped, no artifact is left
    /// behind.
    async fn write_stream(&self, key: &str, stream: ByteStream, limit: Option<u64>)
    -> AppResult<u64>;

    /// Delete a stored object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Create a directory (and any missing parents). Idempotent.
    async fn create_dir(&self, key: &str) -> AppResult<()>;

    /// Delete a directory and all its contents. Missing directories are ignored.
    async fn delete_dir(&self, key: &str) -> AppResult<()>;

    /// Check whether an object or directory exists at `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
