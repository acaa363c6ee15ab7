//! Session verification configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session synchronizer and forced-exit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval between periodic auth-verify checks, in seconds.
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// Delay between showing an eviction message and navigating away.
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,
    /// Path of the sign-in view.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    /// Storage key of the persisted session snapshot.
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,
}

impl SessionConfig {
    /// Periodic check interval as a [`Duration`].
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    /// Eviction redirect delay as a [`Duration`].
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: default_check_interval(),
            redirect_delay_ms: default_redirect_delay(),
            sign_in_path: default_sign_in_path(),
            snapshot_key: default_snapshot_key(),
        }
    }
}

fn default_check_interval() -> u64 {
    30
}

fn default_redirect_delay() -> u64 {
    1800
}

fn default_sign_in_path() -> String {
    "/sign-in".to_string()
}

fn default_snapshot_key() -> String {
    "persist:session".to_string()
}
