//! Expiring key set used for token revocation.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// A set of keys that each expire after their own TTL.
///
/// Entries carry no value. A key is either present until its TTL elapses
/// or absent.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Insert `key` for `ttl`. Re-inserting restarts the TTL.
    async fn insert(&self, key: &str, ttl: Duration) -> AppResult<()>;

    /// Whether `key` is present and unexpired.
    async fn contains(&self, key: &str) -> AppResult<bool>;
}
