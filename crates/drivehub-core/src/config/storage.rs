//! Physical storage configuration.

use serde::{Deserialize, Serialize};

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage root. Created at startup if missing, then canonicalized.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes (default 5 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Remove leftover `.partial` upload artifacts at startup.
    #[serde(default = "default_true")]
    pub sweep_partial_on_startup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            sweep_partial_on_startup: true,
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_max_upload() -> u64 {
    5_368_709_120 // 5 GB
}

fn default_true() -> bool {
    true
}
