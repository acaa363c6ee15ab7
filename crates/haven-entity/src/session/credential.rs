//! The bearer credential triple.

use serde::{Deserialize, Serialize};

use haven_core::types::SessionId;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key of the session id.
pub const SESSION_ID_KEY: &str = "sessionId";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Credential used to authenticate REST calls and the realtime channel.
///
/// The three parts are written and cleared together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    /// Short-lived opaque bearer token.
    pub access_token: String,
    /// Session id, stable per login.
    pub session_id: Option<SessionId>,
    /// Opaque refresh token.
    pub refresh_token: Option<String>,
}

impl SessionCredential {
    /// Credential with all three parts present.
    pub fn new(
        access_token: impl Into<String>,
        session_id: impl Into<SessionId>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            session_id: Some(session_id.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredential")
            .field("access_token", &"<redacted>")
            .field("session_id", &self.session_id)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
