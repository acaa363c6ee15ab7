//! Credentialed REST client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

use haven_core::error::{AppError, ErrorKind};
use haven_core::result::AppResult;

use crate::credential::CredentialStore;

use super::interceptor::{InterceptorChain, ResponseInterceptor};
use super::response::ApiResponse;

/// Header carrying the session id alongside the bearer token.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// HTTP client that attaches the stored credential to each request.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
    chain: InterceptorChain,
}

impl ApiClient {
    /// Build a client rooted at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: Arc<CredentialStore>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            chain: InterceptorChain::new(),
        })
    }

    /// Append a response interceptor.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.chain = self.chain.with(interceptor);
        self
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> AppResult<ApiResponse> {
        self.send(Method::GET, path, None).await
    }

    /// Send a request and run the response through the interceptor chain.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only
    /// transport failures produce a network error.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> AppResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "API request");

        let mut request = self.http.request(method, &url).headers(self.auth_headers());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Network, format!("Request to {path} failed"), e)
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Network,
                    format!("Failed to read response from {path}"),
                    e,
                )
            })?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|_| {
                warn!(path, status, "Non-JSON response body");
                Value::Null
            })
        };

        let response = ApiResponse::new(status, body);
        self.chain.run(path, &response).await;
        Ok(response)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(credential) = self.credentials.load() else {
            return headers;
        };
        match HeaderValue::from_str(&credential.bearer()) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("Stored access token is not a valid header value"),
        }
        if let Some(session_id) = credential.session_id {
            if let Ok(value) = HeaderValue::from_str(session_id.as_str()) {
                headers.insert(SESSION_ID_HEADER, value);
            }
        }
        headers
    }
}
