//! Bootstrap and periodic verification of the session.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use haven_core::error::AppError;
use haven_core::result::AppResult;
use haven_entity::Identity;

use crate::api::AuthApi;
use crate::credential::CredentialStore;
use crate::eviction::{Eviction, EvictionReason};
use crate::store::{SessionAction, SessionStore};

/// Extract an identity from a verify response body.
///
/// Accepts either a nested `user` object or identity fields at the top
/// level next to `authenticated`.
pub fn identity_from_body(body: &Value) -> AppResult<Identity> {
    let mut fields = match body.get("user") {
        Some(user @ Value::Object(_)) => user.clone(),
        _ => body.clone(),
    };
    if let Value::Object(map) = &mut fields {
        map.remove("authenticated");
    }
    serde_json::from_value(fields)
        .map_err(|e| AppError::validation(format!("Verify response carries no identity: {e}")))
}

/// Owns the bootstrap check and the periodic re-verification timer.
#[derive(Debug)]
pub struct SessionSynchronizer {
    api: Arc<dyn AuthApi>,
    store: Arc<SessionStore>,
    credentials: Arc<CredentialStore>,
    eviction: Arc<Eviction>,
    interval: Duration,
}

impl SessionSynchronizer {
    /// Create a synchronizer checking every `interval` while signed in.
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<SessionStore>,
        credentials: Arc<CredentialStore>,
        eviction: Arc<Eviction>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            store,
            credentials,
            eviction,
            interval,
        }
    }

    /// Verify the stored credential once at startup.
    ///
    /// A rejection clears the credential, the snapshot, and the identity. A
    /// request that never reached the backend keeps the current identity.
    pub async fn bootstrap(&self) {
        self.store.dispatch(SessionAction::VerifyStart);

        match self.api.verify().await {
            Ok(response) if response.is_success() && !response.denies_authentication() => {
                match identity_from_body(&response.body) {
                    Ok(identity) => {
                        info!(user_id = %identity.id, role = %identity.role, "Session verified");
                        self.store.dispatch(SessionAction::VerifySuccess(identity));
                    }
                    Err(e) => self.reject(e.message),
                }
            }
            Ok(response) => {
                let message = response
                    .message()
                    .unwrap_or("Session is not authenticated")
                    .to_string();
                debug!(status = response.status, "Session rejected");
                self.reject(message);
            }
            Err(e) if e.is_network() => {
                warn!(error = %e, "Auth verification unreachable; keeping current session");
                self.store.dispatch(SessionAction::VerifyUnreachable);
            }
            Err(e) => self.reject(e.message),
        }
    }

    /// One periodic check.
    ///
    /// Only a suspension is acted upon. An expired session (401) or a
    /// transport failure is left for the next user-initiated request.
    pub async fn check_once(&self) {
        if !self.store.is_signed_in() {
            return;
        }
        match self.api.verify().await {
            Ok(response) if response.is_suspension() => {
                warn!("Periodic check reports suspension");
                self.eviction
                    .evict(EvictionReason::Suspended, response.message());
            }
            Ok(response) => {
                debug!(status = response.status, "Periodic session check");
            }
            Err(e) => {
                debug!(error = %e, "Periodic session check failed");
            }
        }
    }

    /// Run [`check_once`](Self::check_once) every interval until cancelled.
    ///
    /// The next tick is scheduled only after the previous check completes.
    pub fn spawn_periodic(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Periodic session check stopped");
                        break;
                    }
                    _ = tokio::time::sleep(self.interval) => {
                        self.check_once().await;
                    }
                }
            }
        })
    }

    fn reject(&self, message: String) {
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear rejected credential");
        }
        self.store.purge_snapshot();
        self.store.dispatch(SessionAction::VerifyFailure(message));
    }
}
