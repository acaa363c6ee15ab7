//! Navigation guard evaluated on every location change.

use haven_core::traits::Navigator;
use haven_entity::RouteRole;

use crate::location::Location;
use crate::table::RouteTable;

/// What the guard knows about the session when a navigation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Bootstrap or the first session check has not finished.
    Pending,
    /// The session is settled and the visitor has this role.
    Ready(RouteRole),
}

/// Result of guarding a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session not settled yet; show the loading placeholder.
    Loading,
    /// Render the requested view.
    Render,
    /// Replace the location with the canonical one.
    Redirect(String),
    /// Anonymous visitor on a private page; go to sign-in and come back.
    SignIn(String),
    /// Signed-in visitor on a page their role cannot see.
    NotFound,
}

impl GuardOutcome {
    /// Whether the requested view is rendered.
    pub fn renders(&self) -> bool {
        matches!(self, Self::Render)
    }
}

/// Gates the route tree against the visitor's role.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    table: RouteTable,
    sign_in_path: String,
}

impl NavigationGuard {
    /// Guard over the given table, sending anonymous visitors to `sign_in_path`.
    pub fn new(table: RouteTable, sign_in_path: impl Into<String>) -> Self {
        Self {
            table,
            sign_in_path: sign_in_path.into(),
        }
    }

    /// Decide what to do with a navigation. Pure; never touches session state.
    pub fn evaluate(&self, gate: GateState, location: &Location) -> GuardOutcome {
        let GateState::Ready(role) = gate else {
            return GuardOutcome::Loading;
        };

        match self.table.classify(&location.path, role) {
            None if role == RouteRole::Public => {
                let back = urlencoding::encode(&location.to_string()).into_owned();
                GuardOutcome::SignIn(format!("{}?redirect={back}", self.sign_in_path))
            }
            None => GuardOutcome::NotFound,
            Some(canonical) if canonical != location.path => {
                GuardOutcome::Redirect(location.with_path(canonical).to_string())
            }
            Some(_) => GuardOutcome::Render,
        }
    }

    /// Evaluate and perform any navigation the outcome calls for.
    ///
    /// Redirects replace the history entry so the back button does not
    /// bounce between the original and the canonical path.
    pub fn guard(
        &self,
        gate: GateState,
        location: &Location,
        navigator: &dyn Navigator,
    ) -> GuardOutcome {
        let outcome = self.evaluate(gate, location);
        match &outcome {
            GuardOutcome::Redirect(target) | GuardOutcome::SignIn(target) => {
                tracing::debug!(from = %location, to = %target, "Guard redirect");
                navigator.replace(target);
            }
            GuardOutcome::NotFound => {
                tracing::debug!(path = %location.path, "Route not available to role");
            }
            GuardOutcome::Loading | GuardOutcome::Render => {}
        }
        outcome
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(RouteTable::standard(), "/sign-in")
    }
}
