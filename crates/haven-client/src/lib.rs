//! # haven-client
//!
//! Wires the session, routing, and realtime crates into one client:
//! [`ClientState`] holds every shared component, [`AppShell`] drives the
//! lifecycle (bootstrap, navigation, sign-in/out, shutdown).

pub mod app;
pub mod state;

pub use app::AppShell;
pub use state::{ClientState, Platform};
