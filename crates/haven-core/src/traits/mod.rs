//! Platform seams the session layer talks to.
//!
//! The browser primitives (localStorage, cookies, history, toasts, the
//! document element) are modelled as traits so the layer can run under a
//! test harness, a desktop shell, or the headless binary.

pub mod cookies;
pub mod document;
pub mod navigator;
pub mod notifier;
pub mod storage;

pub use cookies::CookieSource;
pub use document::Document;
pub use navigator::Navigator;
pub use notifier::{Notifier, Toast, ToastLevel};
pub use storage::{Storage, StorageEvent};
