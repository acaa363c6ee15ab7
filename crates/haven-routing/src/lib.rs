//! # haven-routing
//!
//! Maps every URL onto the namespace of the current visitor. Haven serves
//! three parallel route trees (`/`, `/user`, `/admin`) that mirror each
//! other for some resources; this crate decides, purely from the path and
//! the visitor's role, whether a path is canonical, must be rewritten into
//! another namespace, or is forbidden.
//!
//! - [`path`]: trailing-slash normalization and prefix/base/rest parsing
//! - [`table`]: the static route families
//! - [`classifier`]: the `(path, role) -> canonical path | forbidden` function
//! - [`guard`]: the per-navigation gate built on the classifier

pub mod classifier;
pub mod guard;
pub mod location;
pub mod path;
pub mod table;

pub use classifier::classify;
pub use guard::{GateState, GuardOutcome, NavigationGuard};
pub use location::Location;
pub use path::{Namespace, ParsedPath, normalize, parse_path};
pub use table::RouteTable;
