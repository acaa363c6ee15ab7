//! Server-initiated removal of the local session.
//!
//! Suspension, forced sign-out, and account deletion all end the same way:
//! the identity and credential are dropped, an explanatory toast is shown,
//! and after a short delay the user is sent to the sign-in page. The delay
//! lets the toast render before the current view unmounts.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use haven_core::traits::{Navigator, Notifier};

use crate::credential::CredentialStore;
use crate::store::SessionStore;

/// Why the session is being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// The account was suspended.
    Suspended,
    /// An administrator signed the user out.
    ForcedSignOut,
    /// The account was deleted.
    Deleted,
}

impl EvictionReason {
    /// Toast shown when the server supplied no message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Suspended => "Your account has been suspended. Please contact support.",
            Self::ForcedSignOut => "You have been signed out by an administrator.",
            Self::Deleted => "Your account has been deleted.",
        }
    }
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suspended => write!(f, "suspended"),
            Self::ForcedSignOut => write!(f, "forced_sign_out"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Tears down the session in response to server-side security events.
pub struct Eviction {
    store: Arc<SessionStore>,
    credentials: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    sign_in_path: String,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for Eviction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eviction")
            .field("sign_in_path", &self.sign_in_path)
            .field("delay", &self.delay)
            .finish()
    }
}

impl Eviction {
    /// Create an eviction handler.
    pub fn new(
        store: Arc<SessionStore>,
        credentials: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        sign_in_path: impl Into<String>,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            credentials,
            navigator,
            notifier,
            sign_in_path: sign_in_path.into(),
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Remove the session and schedule the sign-in redirect.
    ///
    /// Returns `false` without side effects when nobody is signed in, so
    /// duplicate events neither throw nor navigate twice. Must be called
    /// from within a Tokio runtime.
    pub fn evict(&self, reason: EvictionReason, message: Option<&str>) -> bool {
        if !self.store.evict() {
            return false;
        }
        info!(%reason, "Session evicted");

        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear credential during eviction");
        }
        self.store.purge_snapshot();

        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(reason.default_message());
        self.notifier.error(message);

        self.schedule_redirect();
        true
    }

    /// Whether a sign-in redirect is waiting to fire.
    pub fn redirect_pending(&self) -> bool {
        self.pending
            .lock()
            .ok()
            .and_then(|p| p.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Abort a scheduled redirect.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }

    fn schedule_redirect(&self) {
        let Ok(mut pending) = self.pending.lock() else {
            warn!("Eviction redirect lock poisoned");
            return;
        };
        if pending.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let navigator = Arc::clone(&self.navigator);
        let target = self.sign_in_path.clone();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.replace(&target);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::store::SessionAction;
    use haven_core::testing::{Navigation, RecordingNavigator, RecordingNotifier};
    use haven_core::traits::ToastLevel;
    use haven_entity::{AccountRole, Identity, SessionCredential};

    struct Fixture {
        store: Arc<SessionStore>,
        credentials: Arc<CredentialStore>,
        navigator: Arc<RecordingNavigator>,
        notifier: Arc<RecordingNotifier>,
        eviction: Eviction,
    }

    fn fixture() -> Fixture {
        let storage = Arc::new(MemoryStore::new());
        let store = Arc::new(SessionStore::new(storage.clone(), "persist:session"));
        let credentials = Arc::new(CredentialStore::new(storage));
        let navigator = Arc::new(RecordingNavigator::at("/user/settings"));
        let notifier = Arc::new(RecordingNotifier::default());
        let eviction = Eviction::new(
            store.clone(),
            credentials.clone(),
            navigator.clone(),
            notifier.clone(),
            "/sign-in",
            Duration::from_millis(1800),
        );
        store.dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::User)));
        credentials
            .save(&SessionCredential::new("tok", "sess", "ref"))
            .unwrap();
        Fixture {
            store,
            credentials,
            navigator,
            notifier,
            eviction,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_clears_and_redirects_after_delay() {
        let fx = fixture();
        assert!(fx.eviction.evict(EvictionReason::Suspended, Some("Account suspended")));

        assert!(!fx.store.is_signed_in());
        assert!(fx.credentials.load().is_none());
        let toasts = fx.notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Error);
        assert_eq!(toasts[0].message, "Account suspended");

        tokio::time::sleep(Duration::from_millis(1700)).await;
        assert!(fx.navigator.navigations().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            fx.navigator.navigations(),
            vec![Navigation::Replace("/sign-in".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_eviction_is_a_no_op() {
        let fx = fixture();
        assert!(fx.eviction.evict(EvictionReason::ForcedSignOut, None));
        assert!(!fx.eviction.evict(EvictionReason::ForcedSignOut, None));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fx.navigator.navigations().len(), 1);
        assert_eq!(fx.notifier.toasts().len(), 1);
        assert_eq!(
            fx.notifier.toasts()[0].message,
            EvictionReason::ForcedSignOut.default_message()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_redirect() {
        let fx = fixture();
        fx.eviction.evict(EvictionReason::Deleted, Some("  "));
        assert!(fx.eviction.redirect_pending());
        fx.eviction.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(fx.navigator.navigations().is_empty());
        assert_eq!(
            fx.notifier.toasts()[0].message,
            EvictionReason::Deleted.default_message()
        );
    }
}
