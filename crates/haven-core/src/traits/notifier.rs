//! Transient user-facing notifications (toasts).

use serde::{Deserialize, Serialize};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// Neutral information.
    Info,
    /// A completed action.
    Success,
    /// Something the user should notice.
    Warning,
    /// A failure.
    Error,
}

/// A transient notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Severity.
    pub level: ToastLevel,
    /// Message text.
    pub message: String,
}

/// Displays toasts. Never blocks and never fails.
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Show a toast.
    fn notify(&self, toast: Toast);

    /// Show an informational toast.
    fn info(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Info,
            message: message.to_string(),
        });
    }

    /// Show a success toast.
    fn success(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
        });
    }

    /// Show a warning toast.
    fn warning(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Warning,
            message: message.to_string(),
        });
    }

    /// Show an error toast.
    fn error(&self, message: &str) {
        self.notify(Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
        });
    }
}
