//! Authenticated API client
//!
//! Attaches a bearer token to every request and, when the API answers 401,
//! forces a new token and tries again up to `max_retries` times. Every other
//! status is handed back to the caller untouched.

use super::transport::{ApiResponse, ReqwestTransport, Transport, TransportRequest};
use crate::auth::{Authenticator, Credentials, TokenCache, OAUTH_TOKEN_PATH};
use crate::clock::Clock;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::Method;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client that manages its own OAuth2 bearer token
pub struct AuthenticatedClient {
    config: ClientConfig,
    base_url: String,
    transport: Arc<dyn Transport>,
    authenticator: Authenticator,
}

impl AuthenticatedClient {
    /// Create a client using reqwest as transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client with a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let base_url = config.resolved_base_url().to_string();
        let authenticator = Authenticator::new(
            Credentials::new(&config.client_id, &config.secret),
            build_url(&base_url, OAUTH_TOKEN_PATH),
            Arc::clone(&transport),
        );

        Ok(Self {
            config,
            base_url,
            transport,
            authenticator,
        })
    }

    /// Use a different time source for token expiry
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.authenticator = self.authenticator.with_clock(clock);
        self
    }

    /// Request a new token from the token endpoint, replacing the cache
    pub async fn generate_token(&self) -> Result<TokenCache> {
        self.authenticator.generate_token().await
    }

    /// Cached token, refreshed first if it expires within a minute
    pub async fn get_token(&self) -> Result<String> {
        self.authenticator.get_token().await
    }

    /// Snapshot of the token cache
    pub async fn token_cache(&self) -> TokenCache {
        self.authenticator.token_cache().await
    }

    /// Send an authenticated request
    ///
    /// A 401 forces a new token and resends, at most `max_retries` times.
    /// Once the retries are used up the call fails with
    /// `Error::RetriesExhausted`. Any other status, success or not, is
    /// returned as-is.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = build_url(&self.base_url, path);
        let body = body.map(serde_json::to_string).transpose()?;
        let max_retries = self.config.max_retries;
        // u64 so the counter can pass max_retries even at u32::MAX
        let mut attempt: u64 = 0;

        loop {
            if attempt > u64::from(max_retries) {
                warn!(
                    "Giving up on {} {} after {} re-authentication attempts",
                    method, url, max_retries
                );
                return Err(Error::RetriesExhausted { max_retries });
            }

            let token = self.authenticator.get_token().await?;

            let mut req = TransportRequest::new(method, &url)
                .header(AUTHORIZATION, bearer_header(&token)?)
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            if let Some(ref body) = body {
                req = req.body(body.clone());
            }

            debug!("{} {} (attempt {})", method, url, attempt);
            let response = self.transport.send(req).await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            warn!(
                "{} {} returned 401, re-authenticating (attempt {}, max retries {})",
                method, url, attempt, max_retries
            );
            self.authenticator.generate_token().await?;
            attempt += 1;
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, None).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Make a PATCH request with a JSON body
    pub async fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, None).await
    }

    /// Make a request and parse the JSON response
    ///
    /// Unlike `request`, a non-2xx status is turned into `Error::HttpStatus`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let response = self.request(method, path, body).await?;

        if !response.is_success() {
            return Err(Error::http_status(
                response.status().as_u16(),
                response.text(),
            ));
        }

        response.json()
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| Error::token_response(format!("token is not a valid header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build full URL from path
pub(crate) fn build_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
