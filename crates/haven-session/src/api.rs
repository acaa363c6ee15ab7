//! Auth endpoints used by the session layer.

use std::sync::Arc;

use async_trait::async_trait;

use haven_core::config::ApiConfig;
use haven_core::result::AppResult;

use crate::http::{ApiClient, ApiResponse};

/// Backend operations the synchronizer and sign-out flow depend on.
#[async_trait]
pub trait AuthApi: Send + Sync + std::fmt::Debug + 'static {
    /// Verify the stored credential.
    async fn verify(&self) -> AppResult<ApiResponse>;

    /// Revoke the current session server-side.
    async fn sign_out(&self) -> AppResult<ApiResponse>;
}

/// [`AuthApi`] over the REST client.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Arc<ApiClient>,
    verify_path: String,
    signout_path: String,
}

impl HttpAuthApi {
    /// Auth API using the paths from configuration.
    pub fn new(client: Arc<ApiClient>, config: &ApiConfig) -> Self {
        Self {
            client,
            verify_path: config.verify_path.clone(),
            signout_path: config.signout_path.clone(),
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn verify(&self) -> AppResult<ApiResponse> {
        self.client.get(&self.verify_path).await
    }

    async fn sign_out(&self) -> AppResult<ApiResponse> {
        self.client.get(&self.signout_path).await
    }
}
