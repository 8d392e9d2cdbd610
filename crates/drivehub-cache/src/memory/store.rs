//! In-memory expiring key set using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use drivehub_core::result::AppResult;
use drivehub_core::traits::CacheProvider;

/// Expires each key after the TTL stored alongside it.
#[derive(Debug, Clone, Copy)]
struct StoredTtl;

impl Expiry<String, Duration> for StoredTtl {
    fn expire_after_create(&self, _key: &String, ttl: &Duration, _created_at: Instant) -> Option<Duration> {
        Some(*ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        ttl: &Duration,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(*ttl)
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// Key to the TTL it was inserted with.
    cache: Cache<String, Duration>,
}

impl MemoryCacheProvider {
    /// Create a cache holding at most `max_entries` keys.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(StoredTtl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn insert(&self, key: &str, ttl: Duration) -> AppResult<()> {
        self.cache.insert(key.to_string(), ttl).await;
        Ok(())
    }

    async fn contains(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }
}
