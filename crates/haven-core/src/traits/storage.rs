//! Persisted key/value storage trait (the browser's localStorage).

use tokio::sync::broadcast;

use crate::result::AppResult;
use crate::types::TabId;

/// A write observed on shared storage.
///
/// Emitted for every `set`/`remove`. Listeners compare `origin` with their
/// own tab id and ignore their own writes, which mirrors the browser where a
/// tab never receives `storage` events for changes it made itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key that changed.
    pub key: String,
    /// New value, `None` when the key was removed.
    pub new_value: Option<String>,
    /// Tab that performed the write.
    pub origin: TabId,
}

/// Trait for synchronous string key/value storage shared between tabs.
pub trait Storage: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> AppResult<()>;

    /// All keys currently stored.
    fn keys(&self) -> Vec<String>;

    /// Tab id this handle writes as.
    fn origin(&self) -> TabId;

    /// Subscribe to writes from every tab sharing this storage.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
