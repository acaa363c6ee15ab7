//! Session state and its transitions.

use haven_entity::Identity;

/// What the client currently believes about the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// The signed-in principal, `None` for a public visitor.
    pub identity: Option<Identity>,
    /// An auth operation is in flight.
    pub loading: bool,
    /// Message of the last failed auth operation.
    pub error: Option<String>,
}

/// Every way the session state can change.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Sign-in request started.
    SignInStart,
    /// Sign-in succeeded.
    SignInSuccess(Identity),
    /// Sign-in failed.
    SignInFailure(String),
    /// Sign-out request started.
    SignOutStart,
    /// Sign-out finished; the identity is gone.
    SignOutSuccess,
    /// Sign-out request failed.
    SignOutFailure(String),
    /// Profile update started.
    UpdateStart,
    /// Profile update succeeded (or the server pushed a new profile).
    UpdateSuccess(Identity),
    /// Profile update failed.
    UpdateFailure(String),
    /// Auth verification started.
    VerifyStart,
    /// The backend confirmed the identity.
    VerifySuccess(Identity),
    /// The backend rejected the session; the identity is gone.
    VerifyFailure(String),
    /// Verification could not reach the backend; the identity is kept.
    VerifyUnreachable,
    /// The identity was removed by the server (suspension, deletion,
    /// forced sign-out).
    Evicted,
}

/// Apply an action to the state.
pub fn reduce(state: &mut SessionState, action: SessionAction) {
    match action {
        SessionAction::SignInStart
        | SessionAction::SignOutStart
        | SessionAction::UpdateStart
        | SessionAction::VerifyStart => {
            state.loading = true;
            state.error = None;
        }
        SessionAction::SignInSuccess(identity)
        | SessionAction::UpdateSuccess(identity)
        | SessionAction::VerifySuccess(identity) => {
            state.identity = Some(identity);
            state.loading = false;
            state.error = None;
        }
        SessionAction::SignInFailure(message)
        | SessionAction::SignOutFailure(message)
        | SessionAction::UpdateFailure(message) => {
            state.loading = false;
            state.error = Some(message);
        }
        SessionAction::VerifyFailure(message) => {
            state.identity = None;
            state.loading = false;
            state.error = Some(message);
        }
        SessionAction::SignOutSuccess | SessionAction::Evicted => {
            state.identity = None;
            state.loading = false;
            state.error = None;
        }
        SessionAction::VerifyUnreachable => {
            state.loading = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_entity::AccountRole;

    fn signed_in() -> SessionState {
        SessionState {
            identity: Some(Identity::new("u1", AccountRole::User)),
            ..SessionState::default()
        }
    }

    #[test]
    fn test_start_sets_loading_and_clears_error() {
        let mut state = SessionState {
            error: Some("boom".into()),
            ..SessionState::default()
        };
        reduce(&mut state, SessionAction::SignInStart);
        assert!(state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_update_replaces_identity_wholesale() {
        let mut state = signed_in();
        let promoted = Identity::new("u1", AccountRole::Admin);
        reduce(&mut state, SessionAction::UpdateSuccess(promoted.clone()));
        assert_eq!(state.identity, Some(promoted));
    }

    #[test]
    fn test_sign_in_failure_keeps_identity() {
        let mut state = signed_in();
        reduce(&mut state, SessionAction::SignInFailure("bad password".into()));
        assert!(state.identity.is_some());
        assert_eq!(state.error.as_deref(), Some("bad password"));
    }

    #[test]
    fn test_verify_failure_clears_identity() {
        let mut state = signed_in();
        reduce(&mut state, SessionAction::VerifyStart);
        reduce(&mut state, SessionAction::VerifyFailure("expired".into()));
        assert_eq!(state.identity, None);
        assert!(!state.loading);
    }

    #[test]
    fn test_unreachable_verify_preserves_identity() {
        let mut state = signed_in();
        reduce(&mut state, SessionAction::VerifyStart);
        reduce(&mut state, SessionAction::VerifyUnreachable);
        assert!(state.identity.is_some());
        assert!(!state.loading);
    }

    #[test]
    fn test_eviction_clears_everything() {
        let mut state = signed_in();
        state.loading = true;
        reduce(&mut state, SessionAction::Evicted);
        assert_eq!(state, SessionState::default());
    }
}
