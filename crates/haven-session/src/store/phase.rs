//! Application lifecycle state machine.

use std::fmt;

use haven_core::error::AppError;
use haven_core::result::AppResult;

/// Lifecycle phase of the client.
///
/// Views are rendered only in `Ready` and `SigningOut`; every earlier phase
/// shows the loading placeholder so routes are never classified against an
/// identity that has not been verified yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Nothing has run yet.
    #[default]
    Uninitialized,
    /// Stored credentials were read; the first auth check is in flight.
    Bootstrapping,
    /// The session is settled.
    Ready,
    /// An explicit sign-out is in flight.
    SigningOut,
}

/// Inputs to the lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Credential presence check finished.
    Bootstrapped,
    /// The first auth verification settled.
    SessionChecked,
    /// The user asked to sign out.
    SignOutRequested,
    /// Sign-out finished, successfully or not.
    SignOutSettled,
}

impl AppPhase {
    /// Next phase for the event, or a validation error for an invalid
    /// transition.
    pub fn next(self, event: PhaseEvent) -> AppResult<Self> {
        use AppPhase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Uninitialized, Bootstrapped) => Ok(Bootstrapping),
            (Bootstrapping, SessionChecked) => Ok(Ready),
            (Ready, SignOutRequested) => Ok(SigningOut),
            (SigningOut, SignOutSettled) => Ok(Ready),
            (phase, event) => Err(AppError::validation(format!(
                "Invalid lifecycle transition: {event:?} in phase {phase}"
            ))),
        }
    }

    /// Whether the route tree may render.
    pub fn renders_views(&self) -> bool {
        matches!(self, Self::Ready | Self::SigningOut)
    }
}

impl fmt::Display for AppPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Bootstrapping => write!(f, "bootstrapping"),
            Self::Ready => write!(f, "ready"),
            Self::SigningOut => write!(f, "signing_out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let phase = AppPhase::default()
            .next(PhaseEvent::Bootstrapped)
            .and_then(|p| p.next(PhaseEvent::SessionChecked))
            .unwrap();
        assert_eq!(phase, AppPhase::Ready);

        let phase = phase.next(PhaseEvent::SignOutRequested).unwrap();
        assert_eq!(phase, AppPhase::SigningOut);
        assert_eq!(phase.next(PhaseEvent::SignOutSettled).unwrap(), AppPhase::Ready);
    }

    #[test]
    fn test_cannot_skip_bootstrap() {
        assert!(AppPhase::Uninitialized.next(PhaseEvent::SessionChecked).is_err());
        assert!(AppPhase::Bootstrapping.next(PhaseEvent::SignOutRequested).is_err());
    }

    #[test]
    fn test_double_sign_out_is_rejected() {
        assert!(AppPhase::SigningOut.next(PhaseEvent::SignOutRequested).is_err());
    }

    #[test]
    fn test_only_settled_phases_render() {
        assert!(!AppPhase::Uninitialized.renders_views());
        assert!(!AppPhase::Bootstrapping.renders_views());
        assert!(AppPhase::Ready.renders_views());
        assert!(AppPhase::SigningOut.renders_views());
    }
}
