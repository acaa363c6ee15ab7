//! Realtime channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Realtime (WebSocket) channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Interval at which the session-room join is re-asserted, in seconds.
    #[serde(default = "default_rejoin_interval")]
    pub room_rejoin_interval_seconds: u64,
    /// First transport reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_base")]
    pub reconnect_base_delay_ms: u64,
    /// Upper bound for the transport reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_delay_ms: u64,
    /// Buffer size of the domain event broadcast feed.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Cookie holding the session id.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Cookie holding the user id, used when the token carries none.
    #[serde(default = "default_user_cookie")]
    pub user_cookie: String,
}

impl RealtimeConfig {
    /// Room re-join interval as a [`Duration`].
    pub fn room_rejoin_interval(&self) -> Duration {
        Duration::from_secs(self.room_rejoin_interval_seconds)
    }

    /// Backoff delay before the given reconnect attempt (1-based).
    ///
    /// Doubles from the base delay and saturates at the configured maximum.
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let delay = self.reconnect_base_delay_ms.saturating_mul(1 << exp);
        Duration::from_millis(delay.min(self.reconnect_max_delay_ms))
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            room_rejoin_interval_seconds: default_rejoin_interval(),
            reconnect_base_delay_ms: default_reconnect_base(),
            reconnect_max_delay_ms: default_reconnect_max(),
            event_buffer: default_event_buffer(),
            session_cookie: default_session_cookie(),
            user_cookie: default_user_cookie(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:3000/ws".to_string()
}

fn default_rejoin_interval() -> u64 {
    15
}

fn default_reconnect_base() -> u64 {
    1000
}

fn default_reconnect_max() -> u64 {
    30_000
}

fn default_event_buffer() -> usize {
    256
}

fn default_session_cookie() -> String {
    "sessionId".to_string()
}

fn default_user_cookie() -> String {
    "userId".to_string()
}
