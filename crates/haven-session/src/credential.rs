//! Credential persistence.
//!
//! The access token, session id, and refresh token live under three
//! storage keys and are always written and cleared together. Every change
//! bumps a revision that the realtime channel follows, so a connection is
//! never reused across credentials.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use haven_core::result::AppResult;
use haven_core::traits::Storage;
use haven_core::types::SessionId;
use haven_entity::SessionCredential;
use haven_entity::session::credential::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_ID_KEY};

/// Reads and writes the credential triple.
#[derive(Debug)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
    revision: watch::Sender<u64>,
}

impl CredentialStore {
    /// Credentials over the given storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (revision, _) = watch::channel(0);
        Self { storage, revision }
    }

    /// The stored credential, if an access token is present.
    pub fn load(&self) -> Option<SessionCredential> {
        let access_token = self.storage.get(ACCESS_TOKEN_KEY)?;
        Some(SessionCredential {
            access_token,
            session_id: self.session_id(),
            refresh_token: self.storage.get(REFRESH_TOKEN_KEY),
        })
    }

    /// Stored access token.
    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    /// Stored session id.
    pub fn session_id(&self) -> Option<SessionId> {
        self.storage.get(SESSION_ID_KEY).map(SessionId::from)
    }

    /// Whether any part of the credential is stored.
    pub fn is_present(&self) -> bool {
        [ACCESS_TOKEN_KEY, SESSION_ID_KEY, REFRESH_TOKEN_KEY]
            .iter()
            .any(|key| self.storage.get(key).is_some())
    }

    /// Replace the stored credential. Absent parts are removed.
    pub fn save(&self, credential: &SessionCredential) -> AppResult<()> {
        self.storage.set(ACCESS_TOKEN_KEY, &credential.access_token)?;
        match &credential.session_id {
            Some(id) => self.storage.set(SESSION_ID_KEY, id.as_str())?,
            None => self.storage.remove(SESSION_ID_KEY)?,
        }
        match &credential.refresh_token {
            Some(token) => self.storage.set(REFRESH_TOKEN_KEY, token)?,
            None => self.storage.remove(REFRESH_TOKEN_KEY)?,
        }
        self.bump("saved");
        Ok(())
    }

    /// Remove the stored credential. A no-op when nothing is stored.
    pub fn clear(&self) -> AppResult<()> {
        if !self.is_present() {
            return Ok(());
        }
        for key in [ACCESS_TOKEN_KEY, SESSION_ID_KEY, REFRESH_TOKEN_KEY] {
            self.storage.remove(key)?;
        }
        self.bump("cleared");
        Ok(())
    }

    /// Current credential revision.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Observe credential changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self, what: &str) {
        self.revision.send_modify(|rev| *rev += 1);
        debug!(revision = self.revision(), "Credential {what}");
    }
}
