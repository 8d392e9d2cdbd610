//! Cache manager that owns the blocklist provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use drivehub_core::config::CacheConfig;
use drivehub_core::result::AppResult;
use drivehub_core::traits::CacheProvider;

use crate::memory::MemoryCacheProvider;

/// Shared handle to the configured cache provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Build the in-process provider sized from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        info!(
            provider = "memory",
            max_entries = config.max_blocklist_entries,
            "Initializing token blocklist cache"
        );
        Self {
            inner: Arc::new(MemoryCacheProvider::new(config.max_blocklist_entries)),
        }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn insert(&self, key: &str, ttl: Duration) -> AppResult<()> {
        self.inner.insert(key, ttl).await
    }

    async fn contains(&self, key: &str) -> AppResult<bool> {
        self.inner.contains(key).await
    }
}
