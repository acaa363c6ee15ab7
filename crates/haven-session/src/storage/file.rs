//! JSON-file backed storage for the headless shell.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use haven_core::error::AppError;
use haven_core::result::AppResult;
use haven_core::traits::{Storage, StorageEvent};
use haven_core::types::TabId;

/// Capacity of the storage event feed.
const EVENT_CAPACITY: usize = 64;

/// Storage persisted as a single JSON object on disk.
///
/// Entries are cached in memory and the whole document is rewritten on
/// every change (temp file + rename, so a crash never leaves half a file).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
    events: broadcast::Sender<StorageEvent>,
    origin: TabId,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or create on first write) the storage file at `path`.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => {
                let map: BTreeMap<String, String> = serde_json::from_str(&text).map_err(|e| {
                    AppError::storage(format!("Corrupt storage file {}: {e}", path.display()))
                })?;
                for (key, value) in map {
                    entries.insert(key, value);
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(path = %path.display(), keys = entries.len(), "Opened file storage");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            path,
            entries,
            events,
            origin: TabId::new(),
            write_lock: Mutex::new(()),
        })
    }

    fn flush(&self) -> AppResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::storage("Storage write lock poisoned"))?;

        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let text = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn emit(&self, key: &str, new_value: Option<String>) {
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
            origin: self.origin,
        });
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            match previous {
                Some(previous) => {
                    self.entries.insert(key.to_string(), previous);
                }
                None => {
                    self.entries.remove(key);
                }
            }
            return Err(e);
        }
        self.emit(key, Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        if let Some((key, previous)) = self.entries.remove(key) {
            if let Err(e) = self.flush() {
                self.entries.insert(key, previous);
                return Err(e);
            }
            self.emit(&key, None);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    fn origin(&self) -> TabId {
        self.origin
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}
