//! Frames sent by the client.

use serde::Serialize;

use haven_core::result::AppResult;
use haven_core::types::{SessionId, UserId};

/// Room membership requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum Outbound {
    /// Join the room of a user.
    #[serde(rename = "registerUser")]
    RegisterUser {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    /// Join the room of a session.
    #[serde(rename = "registerSession")]
    RegisterSession {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
}

impl Outbound {
    /// Encode as a text frame.
    pub fn encode(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
