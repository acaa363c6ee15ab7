//! Cross-tab session signals.
//!
//! A tab that signs in or out writes a `login`/`logout` key. Every other tab
//! sharing the storage reloads and re-bootstraps from the persisted
//! credential instead of reconciling partial state.

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use haven_core::result::AppResult;
use haven_core::traits::{Navigator, Storage};

/// Storage keys used as cross-tab signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSignal {
    /// A tab signed in.
    Login,
    /// A tab signed out.
    Logout,
}

impl TabSignal {
    /// Storage key carrying the signal.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
        }
    }

    /// Signal for a storage key, if it is one.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }

    /// Announce the signal to other tabs. The value is a timestamp so that
    /// consecutive signals always change the key.
    pub fn broadcast(&self, storage: &dyn Storage) -> AppResult<()> {
        let stamp = chrono::Utc::now().timestamp_millis().to_string();
        storage.set(self.key(), &stamp)
    }
}

impl fmt::Display for TabSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Reloads this tab when another tab signs in or out.
#[derive(Debug, Clone)]
pub struct CrossTabSync {
    storage: Arc<dyn Storage>,
    navigator: Arc<dyn Navigator>,
}

impl CrossTabSync {
    /// Listener over the given storage.
    pub fn new(storage: Arc<dyn Storage>, navigator: Arc<dyn Navigator>) -> Self {
        Self { storage, navigator }
    }

    /// Listen until cancelled.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        let mut events = self.storage.subscribe();
        let own = self.storage.origin();

        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => event,
                };
                match event {
                    Ok(event) if event.origin == own => {}
                    Ok(event) => {
                        if let Some(signal) = TabSignal::from_key(&event.key) {
                            info!(%signal, "Session changed in another tab; reloading");
                            self.navigator.reload();
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Storage events lagged");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Storage event feed closed");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use haven_core::testing::{Navigation, RecordingNavigator};
    use std::time::Duration;

    #[test]
    fn test_signal_keys() {
        assert_eq!(TabSignal::from_key("login"), Some(TabSignal::Login));
        assert_eq!(TabSignal::from_key("logout"), Some(TabSignal::Logout));
        assert_eq!(TabSignal::from_key("accessToken"), None);
    }

    #[tokio::test]
    async fn test_foreign_signal_reloads_own_does_not() {
        let tab_a = Arc::new(MemoryStore::new());
        let tab_b = Arc::new(tab_a.open_tab());
        let navigator = Arc::new(RecordingNavigator::default());
        let cancel = CancellationToken::new();
        let handle = CrossTabSync::new(tab_a.clone(), navigator.clone()).spawn(cancel.clone());

        TabSignal::Login.broadcast(tab_a.as_ref()).unwrap();
        tab_b.set("theme", "dark").unwrap();
        TabSignal::Logout.broadcast(tab_b.as_ref()).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(navigator.navigations(), vec![Navigation::Reload]);

        cancel.cancel();
        handle.await.unwrap();
    }
}
