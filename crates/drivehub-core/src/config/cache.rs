//! Token blocklist cache configuration.

use serde::{Deserialize, Serialize};

/// Sizing for the in-process blocklist cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Upper bound on revoked tokens held at once. Past it, the cache evicts
    /// entries before their TTL, so size it above the expected number of
    /// logouts per access-token lifetime.
    #[serde(default = "default_max_blocklist_entries")]
    pub max_blocklist_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_blocklist_entries: default_max_blocklist_entries(),
        }
    }
}

fn default_max_blocklist_entries() -> u64 {
    100_000
}
