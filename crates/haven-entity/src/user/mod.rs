//! Signed-in principal and its roles.

pub mod model;
pub mod role;
pub mod status;

pub use model::Identity;
pub use role::{AccountRole, RouteRole};
pub use status::ApprovalStatus;
