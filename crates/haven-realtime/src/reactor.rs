//! Account-level security events for the signed-in user.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use haven_session::{Eviction, EvictionReason, SessionAction, SessionStore};

use crate::event::{AccountChange, DomainEvent};

/// Applies account events addressed to the current identity.
///
/// Events about other accounts, and every event while signed out, are
/// ignored. Evictions go through [`Eviction`], which makes a repeated event
/// a no-op.
#[derive(Debug, Clone)]
pub struct SecurityReactor {
    store: Arc<SessionStore>,
    eviction: Arc<Eviction>,
}

impl SecurityReactor {
    /// React on behalf of the identity held by `store`.
    pub fn new(store: Arc<SessionStore>, eviction: Arc<Eviction>) -> Self {
        Self { store, eviction }
    }

    /// Handle one event. Returns whether the session was touched.
    pub fn handle(&self, event: &DomainEvent) -> bool {
        let Some(current) = self.store.identity() else {
            return false;
        };
        let Some(subject) = event.subject() else {
            return false;
        };
        if !current.is(subject) {
            debug!(event = event.name(), %subject, "Account event for another user");
            return false;
        }

        match event {
            DomainEvent::AccountSuspended { .. } => {
                self.eviction.evict(EvictionReason::Suspended, None)
            }
            DomainEvent::ForceSignout { message, .. } => self
                .eviction
                .evict(EvictionReason::ForcedSignOut, message.as_deref()),
            DomainEvent::UserUpdate(change) | DomainEvent::AdminUpdate(change) => match change {
                AccountChange::Add { user } | AccountChange::Update { user } => {
                    info!(user_id = %user.id, role = %user.role, "Identity updated by server");
                    self.store.dispatch(SessionAction::UpdateSuccess(user.clone()));
                    true
                }
                AccountChange::Delete { .. } => self.eviction.evict(EvictionReason::Deleted, None),
            },
            _ => false,
        }
    }

    /// Consume `events` until cancelled or the feed closes.
    pub fn spawn(
        self,
        mut events: broadcast::Receiver<DomainEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => event,
                };
                match event {
                    Ok(event) => {
                        self.handle(&event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Security reactor lagged behind realtime events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
