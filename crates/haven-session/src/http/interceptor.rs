//! Composable response interceptors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::eviction::{Eviction, EvictionReason};

use super::response::ApiResponse;

/// Observes every response that passes through the [`ApiClient`](super::ApiClient).
#[async_trait]
pub trait ResponseInterceptor: Send + Sync + std::fmt::Debug + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect a response. Interceptors cannot fail; they act on the
    /// session and leave the caller's result untouched.
    async fn on_response(&self, path: &str, response: &ApiResponse);
}

/// Ordered list of interceptors.
#[derive(Debug, Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl InterceptorChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor.
    pub fn with(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Number of interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run every interceptor in order.
    pub async fn run(&self, path: &str, response: &ApiResponse) {
        for interceptor in &self.interceptors {
            debug!(interceptor = interceptor.name(), path, status = response.status, "Intercept");
            interceptor.on_response(path, response).await;
        }
    }
}

/// Evicts the session when any endpoint reports a suspended account.
#[derive(Debug)]
pub struct SuspensionInterceptor {
    eviction: Arc<Eviction>,
}

impl SuspensionInterceptor {
    /// Interceptor acting through the given eviction handler.
    pub fn new(eviction: Arc<Eviction>) -> Self {
        Self { eviction }
    }
}

#[async_trait]
impl ResponseInterceptor for SuspensionInterceptor {
    fn name(&self) -> &'static str {
        "suspension"
    }

    async fn on_response(&self, path: &str, response: &ApiResponse) {
        if !response.is_suspension() {
            return;
        }
        warn!(path, "Suspension reported by backend");
        self.eviction
            .evict(EvictionReason::Suspended, response.message());
    }
}
