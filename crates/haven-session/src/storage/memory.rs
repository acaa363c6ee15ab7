//! In-memory storage shared between simulated tabs.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

use haven_core::result::AppResult;
use haven_core::traits::{Storage, StorageEvent};
use haven_core::types::TabId;

/// Capacity of the storage event feed.
const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
struct Shared {
    entries: DashMap<String, String>,
    events: broadcast::Sender<StorageEvent>,
}

/// In-memory storage provider.
///
/// Cloning shares the same tab; [`MemoryStore::open_tab`] returns a handle
/// to the same entries that writes as a different tab.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    origin: TabId,
}

impl MemoryStore {
    /// Create empty storage for a single tab.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                entries: DashMap::new(),
                events,
            }),
            origin: TabId::new(),
        }
    }

    /// A second tab over the same storage.
    pub fn open_tab(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            origin: TabId::new(),
        }
    }

    fn emit(&self, key: &str, new_value: Option<String>) {
        // No receivers is not an error: nobody is listening yet.
        let _ = self.shared.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
            origin: self.origin,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.shared.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.shared.entries.insert(key.to_string(), value.to_string());
        self.emit(key, Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        if self.shared.entries.remove(key).is_some() {
            self.emit(key, None);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.shared.entries.iter().map(|e| e.key().clone()).collect()
    }

    fn origin(&self) -> TabId {
        self.origin
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        store.remove("theme").unwrap();
        assert_eq!(store.get("theme"), None);
        store.remove("theme").unwrap();
    }

    #[test]
    fn test_tabs_share_entries_with_distinct_origins() {
        let first = MemoryStore::new();
        let second = first.open_tab();
        first.set("accessToken", "t1").unwrap();
        assert_eq!(second.get("accessToken").as_deref(), Some("t1"));
        assert_ne!(first.origin(), second.origin());
    }

    #[tokio::test]
    async fn test_events_carry_origin() {
        let first = MemoryStore::new();
        let second = first.open_tab();
        let mut rx = second.subscribe();

        first.set("login", "1700000000000").unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, "login");
        assert_eq!(event.origin, first.origin());

        first.remove("login").unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.new_value, None);
    }
}
