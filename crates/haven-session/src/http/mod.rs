//! HTTP client and response interceptors.
//!
//! Every REST call goes through [`ApiClient`], which attaches the stored
//! credential and runs each response through an [`InterceptorChain`]. The
//! suspension rule (HTTP 403 meaning "account suspended") is one named
//! interceptor in that chain.

pub mod client;
pub mod interceptor;
pub mod response;

pub use client::ApiClient;
pub use interceptor::{InterceptorChain, ResponseInterceptor, SuspensionInterceptor};
pub use response::ApiResponse;
