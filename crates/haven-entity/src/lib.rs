//! # haven-entity
//!
//! Client-side models for the Haven session layer: the signed-in
//! [`Identity`](user::Identity), its roles and statuses, the session
//! credential triple, and the display theme.

pub mod session;
pub mod theme;
pub mod user;

pub use session::SessionCredential;
pub use theme::Theme;
pub use user::{AccountRole, ApprovalStatus, Identity, RouteRole};
