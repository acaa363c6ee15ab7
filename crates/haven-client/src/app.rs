//! Client lifecycle.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use haven_core::result::AppResult;
use haven_entity::theme::THEME_KEY;
use haven_entity::{Identity, SessionCredential, Theme};
use haven_routing::{GateState, GuardOutcome, Location};
use haven_session::sync::TabSignal;
use haven_session::{CrossTabSync, PhaseEvent, SessionAction, transfer};

use crate::state::ClientState;

/// Drives the client: startup, navigation, explicit auth actions, shutdown.
#[derive(Debug)]
pub struct AppShell {
    state: ClientState,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl AppShell {
    /// Wrap the shared components. Nothing runs until [`start`](Self::start).
    pub fn new(state: ClientState) -> Self {
        Self {
            state,
            cancel: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Shared components.
    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Start the client on `initial_url`.
    ///
    /// Adopts any transferred session, applies the stored theme, verifies
    /// the session, opens the realtime channel, starts the background
    /// listeners, and finally guards the initial location.
    pub async fn start(&self, initial_url: &str) -> AppResult<GuardOutcome> {
        info!("Starting Haven client...");
        let state = &self.state;
        let platform = &state.platform;

        // ── Step 1: URL hand-off ─────────────────────────────────────
        match transfer::adopt(initial_url, &state.credentials) {
            Ok(Some(handoff)) => platform.navigator.replace(&handoff.cleaned),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring malformed start URL"),
        }

        // ── Step 2: Theme ────────────────────────────────────────────
        let theme = Theme::from_stored(platform.storage.get(THEME_KEY).as_deref());
        platform.document.set_dark_mode(theme.is_dark());

        // ── Step 3: Bootstrap and first session check ────────────────
        debug!(credential = state.credentials.is_present(), "Stored credential checked");
        state.store.advance(PhaseEvent::Bootstrapped)?;
        state.synchronizer.bootstrap().await;
        state.store.advance(PhaseEvent::SessionChecked)?;

        // ── Step 4: Realtime ─────────────────────────────────────────
        let reactor = state
            .reactor
            .clone()
            .spawn(state.realtime.subscribe(), self.cancel.child_token());
        let revisions = state.credentials.subscribe();
        state.realtime.reconnect().await;
        let follower = Arc::clone(&state.realtime)
            .follow_credentials(revisions, self.cancel.child_token());

        // ── Step 5: Background checks ────────────────────────────────
        let periodic = Arc::clone(&state.synchronizer).spawn_periodic(self.cancel.child_token());
        let cross_tab = CrossTabSync::new(
            Arc::clone(&platform.storage),
            Arc::clone(&platform.navigator),
        )
        .spawn(self.cancel.child_token());

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.extend([reactor, follower, periodic, cross_tab]);
        }

        let current = platform.navigator.current();
        let outcome = self.guard(&current);
        info!(phase = %state.store.phase(), role = %state.store.route_role(), "Haven client ready");
        Ok(outcome)
    }

    /// Navigate to `target` and guard the new location.
    pub fn navigate(&self, target: &str) -> GuardOutcome {
        self.state.platform.navigator.push(target);
        self.guard(target)
    }

    /// Guard a location against the current session.
    pub fn guard(&self, target: &str) -> GuardOutcome {
        let store = &self.state.store;
        let gate = if store.phase().renders_views() {
            GateState::Ready(store.route_role())
        } else {
            GateState::Pending
        };
        self.state.guard.guard(
            gate,
            &Location::parse(target),
            self.state.platform.navigator.as_ref(),
        )
    }

    /// Commit a completed sign-in.
    ///
    /// Stores the credential (which rebuilds the realtime channel), sets the
    /// identity, tells other tabs, and moves to the role's home.
    pub fn sign_in(&self, identity: Identity, credential: &SessionCredential) -> AppResult<()> {
        let state = &self.state;
        state.store.dispatch(SessionAction::SignInStart);
        if let Err(e) = state.credentials.save(credential) {
            state.store.dispatch(SessionAction::SignInFailure(e.message.clone()));
            return Err(e);
        }

        let home = identity.role.route_role().home();
        info!(user_id = %identity.id, role = %identity.role, "Signed in");
        state.store.dispatch(SessionAction::SignInSuccess(identity));
        if let Err(e) = TabSignal::Login.broadcast(state.platform.storage.as_ref()) {
            warn!(error = %e, "Failed to broadcast sign-in to other tabs");
        }
        state.platform.navigator.replace(home);
        Ok(())
    }

    /// Sign out.
    ///
    /// The local session is removed whatever the backend answers; a failed
    /// request only produces a warning toast.
    pub async fn sign_out(&self) -> AppResult<()> {
        let state = &self.state;
        state.store.advance(PhaseEvent::SignOutRequested)?;
        state.store.dispatch(SessionAction::SignOutStart);

        match state.api.sign_out().await {
            Ok(response) if response.is_success() => debug!("Server session revoked"),
            Ok(response) => {
                warn!(status = response.status, "Sign-out rejected by server");
                state
                    .platform
                    .notifier
                    .warning("Signed out locally; the server did not confirm the sign-out.");
            }
            Err(e) => {
                warn!(error = %e, "Sign-out request failed");
                state
                    .platform
                    .notifier
                    .warning("Signed out locally; the server could not be reached.");
            }
        }

        if let Err(e) = state.credentials.clear() {
            warn!(error = %e, "Failed to clear credential on sign-out");
        }
        state.store.purge_snapshot();
        state.store.dispatch(SessionAction::SignOutSuccess);
        if let Err(e) = TabSignal::Logout.broadcast(state.platform.storage.as_ref()) {
            warn!(error = %e, "Failed to broadcast sign-out to other tabs");
        }
        state.platform.navigator.replace(&state.config.session.sign_in_path);
        state.store.advance(PhaseEvent::SignOutSettled)?;
        info!("Signed out");
        Ok(())
    }

    /// Stop every background task and close the realtime channel.
    pub async fn shutdown(&self) {
        info!("Shutting down Haven client...");
        self.cancel.cancel();
        let tasks = self
            .tasks
            .lock()
            .map(|mut tasks| std::mem::take(&mut *tasks))
            .unwrap_or_default();
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Background task ended abnormally");
            }
        }
        self.state.eviction.cancel();
        self.state.realtime.disconnect().await;
        info!("Haven client stopped");
    }
}
