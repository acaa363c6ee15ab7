//! Headless platform adapters that log instead of rendering.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use haven_core::traits::{CookieSource, Document, Navigator, Notifier, Toast, ToastLevel};

/// Cookies from `HAVEN_COOKIES`, in `Cookie` header form (`a=1; b=2`).
#[derive(Debug, Default)]
pub struct EnvCookies {
    values: HashMap<String, String>,
}

impl EnvCookies {
    pub fn from_env() -> Self {
        std::env::var("HAVEN_COOKIES")
            .map(|header| Self::parse(&header))
            .unwrap_or_default()
    }

    fn parse(header: &str) -> Self {
        let values = header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self { values }
    }
}

impl CookieSource for EnvCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Tracks the current location and logs every navigation.
#[derive(Debug)]
pub struct LogNavigator {
    current: Mutex<String>,
}

impl LogNavigator {
    /// Start at the path and query of `url`.
    pub fn for_url(url: &str) -> Self {
        Self {
            current: Mutex::new(path_of(url).to_string()),
        }
    }

    fn set(&self, path: &str) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }
}

fn path_of(url: &str) -> &str {
    let Some((_, rest)) = url.split_once("://") else {
        return url;
    };
    rest.find('/').map(|i| &rest[i..]).unwrap_or("/")
}

impl Navigator for LogNavigator {
    fn current(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, path: &str) {
        tracing::info!("Navigate (replace) -> {}", path);
        self.set(path);
    }

    fn push(&self, path: &str) {
        tracing::info!("Navigate (push) -> {}", path);
        self.set(path);
    }

    fn hard_navigate(&self, url: &str) {
        tracing::warn!("Full page load -> {}", url);
        self.set(path_of(url));
    }

    fn reload(&self) {
        tracing::warn!("Reload requested at {}", self.current());
    }
}

/// Writes toasts to the log.
#[derive(Debug)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => tracing::error!("[toast] {}", toast.message),
            ToastLevel::Warning => tracing::warn!("[toast] {}", toast.message),
            ToastLevel::Info | ToastLevel::Success => tracing::info!("[toast] {}", toast.message),
        }
    }
}

/// Logs theme changes.
#[derive(Debug)]
pub struct LogDocument;

impl Document for LogDocument {
    fn set_dark_mode(&self, enabled: bool) {
        tracing::info!("Dark mode: {}", enabled);
    }
}
