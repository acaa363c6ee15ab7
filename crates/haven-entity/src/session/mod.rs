//! Session credential model.

pub mod credential;

pub use credential::SessionCredential;
