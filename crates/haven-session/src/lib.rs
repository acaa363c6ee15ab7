//! # haven-session
//!
//! Authentication state for the Haven client:
//!
//! - Session store: the single source of truth for the signed-in identity,
//!   mutated only through [`SessionAction`](store::SessionAction)s, plus the
//!   [`AppPhase`](store::AppPhase) state machine that gates rendering
//! - Credential store over persisted [`Storage`](haven_core::traits::Storage)
//! - HTTP client with a composable response interceptor chain
//! - Bootstrap and periodic auth verification, cross-tab sync
//! - Forced exits (suspension, forced sign-out, deletion)

pub mod api;
pub mod credential;
pub mod eviction;
pub mod http;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use api::{AuthApi, HttpAuthApi};
pub use credential::CredentialStore;
pub use eviction::{Eviction, EvictionReason};
pub use http::{ApiClient, ApiResponse, InterceptorChain, ResponseInterceptor, SuspensionInterceptor};
pub use storage::{FileStore, MemoryStore};
pub use store::{AppPhase, PhaseEvent, SessionAction, SessionState, SessionStore};
pub use sync::{CrossTabSync, SessionSynchronizer, TabSignal};
