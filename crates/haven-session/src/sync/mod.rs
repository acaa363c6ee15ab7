//! Keeping the local session in agreement with the backend and other tabs.

pub mod cross_tab;
pub mod synchronizer;

pub use cross_tab::{CrossTabSync, TabSignal};
pub use synchronizer::{SessionSynchronizer, identity_from_body};
