//! Events the channel acts on itself.

use serde::{Deserialize, Serialize};

use haven_core::types::SessionId;

/// Server-initiated logouts addressed to the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ChannelEvent {
    /// Log out whoever holds this connection.
    #[serde(rename = "forceLogout")]
    ForceLogout {
        #[serde(default)]
        reason: Option<String>,
    },
    /// Log out only the device holding this session.
    #[serde(rename = "forceLogoutSession")]
    ForceLogoutSession {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
        #[serde(default)]
        reason: Option<String>,
    },
}

impl ChannelEvent {
    /// Wire names of the channel-level events.
    pub const NAMES: [&'static str; 2] = ["forceLogout", "forceLogoutSession"];

    /// Reason given by the server, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::ForceLogout { reason } | Self::ForceLogoutSession { reason, .. } => {
                reason.as_deref()
            }
        }
    }
}
