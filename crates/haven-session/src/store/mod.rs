//! The session store: single source of truth for the signed-in identity.

pub mod phase;
pub mod state;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use haven_core::result::AppResult;
use haven_core::traits::Storage;
use haven_entity::{Identity, RouteRole};

pub use phase::{AppPhase, PhaseEvent};
pub use state::{SessionAction, SessionState, reduce};

/// Holds the session state and the lifecycle phase.
///
/// State is mutated only through [`SessionStore::dispatch`]. The identity is
/// mirrored into storage under the snapshot key so a reload starts from the
/// last known identity until verification settles.
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    phase: watch::Sender<AppPhase>,
    storage: Arc<dyn Storage>,
    snapshot_key: String,
}

impl SessionStore {
    /// Create a store, rehydrating the identity from the snapshot if present.
    pub fn new(storage: Arc<dyn Storage>, snapshot_key: impl Into<String>) -> Self {
        let snapshot_key = snapshot_key.into();
        let identity = storage
            .get(&snapshot_key)
            .and_then(|raw| match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable session snapshot");
                    None
                }
            });

        let (state, _) = watch::channel(SessionState {
            identity,
            ..SessionState::default()
        });
        let (phase, _) = watch::channel(AppPhase::default());

        Self {
            state,
            phase,
            storage,
            snapshot_key,
        }
    }

    /// Apply a transition.
    pub fn dispatch(&self, action: SessionAction) {
        debug!(action = action_name(&action), "Session action");
        let mut changed = None;
        self.state.send_modify(|state| {
            let before = state.identity.clone();
            reduce(state, action);
            if state.identity != before {
                changed = Some(state.identity.clone());
            }
        });
        if let Some(identity) = changed {
            self.persist(identity.as_ref());
        }
    }

    /// Remove the identity if there is one. Returns whether anything changed,
    /// so repeated evictions are no-ops.
    pub fn evict(&self) -> bool {
        let evicted = self.state.send_if_modified(|state| {
            if state.identity.is_none() {
                return false;
            }
            reduce(state, SessionAction::Evicted);
            true
        });
        if evicted {
            self.persist(None);
        }
        evicted
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Current identity.
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    /// Whether someone is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.state.borrow().identity.is_some()
    }

    /// Routing role of the current identity.
    pub fn route_role(&self) -> RouteRole {
        RouteRole::of(self.state.borrow().identity.as_ref())
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> AppPhase {
        *self.phase.borrow()
    }

    /// Drive the lifecycle state machine.
    pub fn advance(&self, event: PhaseEvent) -> AppResult<AppPhase> {
        let next = self.phase().next(event)?;
        self.phase.send_replace(next);
        debug!(phase = %next, "Lifecycle phase");
        Ok(next)
    }

    /// Observe lifecycle changes.
    pub fn subscribe_phase(&self) -> watch::Receiver<AppPhase> {
        self.phase.subscribe()
    }

    /// Drop the persisted snapshot.
    pub fn purge_snapshot(&self) {
        if let Err(e) = self.storage.remove(&self.snapshot_key) {
            warn!(error = %e, "Failed to purge session snapshot");
        }
    }

    fn persist(&self, identity: Option<&Identity>) {
        let result = match identity {
            Some(identity) => serde_json::to_string(identity)
                .map_err(Into::into)
                .and_then(|raw| self.storage.set(&self.snapshot_key, &raw)),
            None => self.storage.remove(&self.snapshot_key),
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist session snapshot");
        }
    }
}

fn action_name(action: &SessionAction) -> &'static str {
    match action {
        SessionAction::SignInStart => "sign_in_start",
        SessionAction::SignInSuccess(_) => "sign_in_success",
        SessionAction::SignInFailure(_) => "sign_in_failure",
        SessionAction::SignOutStart => "sign_out_start",
        SessionAction::SignOutSuccess => "sign_out_success",
        SessionAction::SignOutFailure(_) => "sign_out_failure",
        SessionAction::UpdateStart => "update_start",
        SessionAction::UpdateSuccess(_) => "update_success",
        SessionAction::UpdateFailure(_) => "update_failure",
        SessionAction::VerifyStart => "verify_start",
        SessionAction::VerifySuccess(_) => "verify_success",
        SessionAction::VerifyFailure(_) => "verify_failure",
        SessionAction::VerifyUnreachable => "verify_unreachable",
        SessionAction::Evicted => "evicted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use haven_entity::AccountRole;

    const KEY: &str = "persist:session";

    fn store() -> (Arc<MemoryStore>, SessionStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = SessionStore::new(storage.clone(), KEY);
        (storage, store)
    }

    #[test]
    fn test_dispatch_persists_snapshot() {
        let (storage, store) = store();
        store.dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::User)));
        assert!(storage.get(KEY).is_some());

        store.dispatch(SessionAction::SignOutSuccess);
        assert_eq!(storage.get(KEY), None);
    }

    #[test]
    fn test_rehydrates_from_snapshot() {
        let (storage, store) = store();
        store.dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::Admin)));

        let reloaded = SessionStore::new(storage.clone(), KEY);
        assert_eq!(reloaded.route_role(), RouteRole::Admin);
    }

    #[test]
    fn test_unreadable_snapshot_is_ignored() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(KEY, "{broken").unwrap();
        let store = SessionStore::new(storage, KEY);
        assert!(!store.is_signed_in());
    }

    #[test]
    fn test_evict_is_idempotent() {
        let (_, store) = store();
        store.dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::User)));
        assert!(store.evict());
        assert!(!store.evict());
        assert_eq!(store.route_role(), RouteRole::Public);
    }

    #[test]
    fn test_advance_rejects_invalid_transition() {
        let (_, store) = store();
        assert!(store.advance(PhaseEvent::SessionChecked).is_err());
        assert_eq!(store.phase(), AppPhase::Uninitialized);
        store.advance(PhaseEvent::Bootstrapped).unwrap();
        store.advance(PhaseEvent::SessionChecked).unwrap();
        assert_eq!(store.phase(), AppPhase::Ready);
    }

    #[tokio::test]
    async fn test_subscribers_observe_identity_changes() {
        let (_, store) = store();
        let mut rx = store.subscribe();
        store.dispatch(SessionAction::SignInSuccess(Identity::new("u1", AccountRole::User)));
        rx.changed().await.unwrap();
        assert!(rx.borrow().identity.is_some());
    }
}
