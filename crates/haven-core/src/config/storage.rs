//! Persisted client storage configuration.

use serde::{Deserialize, Serialize};

/// Where the file-backed storage keeps its JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON storage file.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "data/haven-storage.json".to_string()
}
