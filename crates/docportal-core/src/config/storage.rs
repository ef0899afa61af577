//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration for uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local storage provider.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes, enforced through the request body
    /// limit (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}
