//! REST backend configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// REST backend endpoints and client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every API path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Auth-verify endpoint path.
    #[serde(default = "default_verify_path")]
    pub verify_path: String,
    /// Sign-out endpoint path.
    #[serde(default = "default_signout_path")]
    pub signout_path: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            verify_path: default_verify_path(),
            signout_path: default_signout_path(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_verify_path() -> String {
    "/api/auth/verify".to_string()
}

fn default_signout_path() -> String {
    "/api/auth/signout".to_string()
}

fn default_timeout() -> u64 {
    15
}
