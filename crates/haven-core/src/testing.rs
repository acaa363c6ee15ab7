//! Recording implementations of the platform traits for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::traits::{CookieSource, Document, Navigator, Notifier, Toast};

/// A navigation performed through [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// `replace(path)`.
    Replace(String),
    /// `push(path)`.
    Push(String),
    /// `hard_navigate(url)`.
    Hard(String),
    /// `reload()`.
    Reload,
}

/// Navigator that records every call and tracks the current path.
#[derive(Debug)]
pub struct RecordingNavigator {
    current: Mutex<String>,
    log: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    /// Start at the given path.
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Every navigation so far, oldest first.
    pub fn navigations(&self) -> Vec<Navigation> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn record(&self, nav: Navigation, path: Option<&str>) {
        if let Some(path) = path {
            if let Ok(mut current) = self.current.lock() {
                *current = path.to_string();
            }
        }
        if let Ok(mut log) = self.log.lock() {
            log.push(nav);
        }
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl Navigator for RecordingNavigator {
    fn current(&self) -> String {
        self.current.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn replace(&self, path: &str) {
        self.record(Navigation::Replace(path.to_string()), Some(path));
    }

    fn push(&self, path: &str) {
        self.record(Navigation::Push(path.to_string()), Some(path));
    }

    fn hard_navigate(&self, url: &str) {
        self.record(Navigation::Hard(url.to_string()), Some(url));
    }

    fn reload(&self) {
        self.record(Navigation::Reload, None);
    }
}

/// Notifier that records every toast.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    /// Every toast so far, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

/// Document that remembers the last dark-mode toggle.
#[derive(Debug, Default)]
pub struct RecordingDocument {
    dark: Mutex<Option<bool>>,
}

impl RecordingDocument {
    /// Last value passed to `set_dark_mode`, if any.
    pub fn dark_mode(&self) -> Option<bool> {
        self.dark.lock().ok().and_then(|d| *d)
    }
}

impl Document for RecordingDocument {
    fn set_dark_mode(&self, enabled: bool) {
        if let Ok(mut dark) = self.dark.lock() {
            *dark = Some(enabled);
        }
    }
}

/// Mutable in-memory cookie jar.
#[derive(Debug, Default)]
pub struct StaticCookies {
    values: Mutex<HashMap<String, String>>,
}

impl StaticCookies {
    /// Build a jar from name/value pairs.
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        let jar = Self::default();
        for (name, value) in pairs {
            jar.set(name, value);
        }
        jar
    }

    /// Set a cookie.
    pub fn set(&self, name: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove a cookie.
    pub fn remove(&self, name: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(name);
        }
    }
}

impl CookieSource for StaticCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.values.lock().ok().and_then(|v| v.get(name).cloned())
    }
}
