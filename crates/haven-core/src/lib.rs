//! # haven-core
//!
//! Core crate for the Haven client session layer. Contains configuration
//! schemas, typed identifiers, the platform seams the layer talks to
//! (storage, cookies, navigation, toasts, document), and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Haven crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::AppError;
pub use result::AppResult;
