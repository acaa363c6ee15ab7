//! Shell configuration.

use serde::{Deserialize, Serialize};

/// Settings for the headless shell binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL the shell treats as the initial page load.
    #[serde(default = "default_start_url")]
    pub start_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
        }
    }
}

fn default_start_url() -> String {
    "http://localhost:5173/".to_string()
}
