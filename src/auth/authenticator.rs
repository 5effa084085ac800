//! Authenticator implementation
//!
//! Owns the token cache and talks to the OAuth2 token endpoint.

use super::types::{Credentials, TokenCache, TokenResponse};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::http::{Transport, TransportRequest};
use crate::types::Method;
use base64::Engine as _;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Path of the token endpoint, relative to the API base URL
pub const OAUTH_TOKEN_PATH: &str = "/oauth2/token";

/// Form body of a client-credentials grant
pub const CLIENT_CREDENTIALS_BODY: &str = "grant_type=client_credentials";

/// Fetches bearer tokens with the client-credentials grant and caches the last one
pub struct Authenticator {
    credentials: Credentials,
    token_url: String,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    // The lock is never held across the token request; concurrent refreshes
    // each hit the endpoint and the last writer wins.
    cache: RwLock<TokenCache>,
}

impl Authenticator {
    /// Create an authenticator with an empty cache
    pub fn new(
        credentials: Credentials,
        token_url: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            transport,
            clock: Arc::new(SystemClock),
            cache: RwLock::new(TokenCache::default()),
        }
    }

    /// Use a different time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Request a new token, bypassing the cache, and store it
    ///
    /// The cache is left untouched when the request fails.
    pub async fn generate_token(&self) -> Result<TokenCache> {
        let request = TransportRequest::new(Method::POST, &self.token_url)
            .header(AUTHORIZATION, self.basic_auth_header()?)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(CLIENT_CREDENTIALS_BODY);

        let response = self.transport.send(request).await?;

        if response.status() != StatusCode::OK {
            return Err(Error::auth(
                response.status().as_u16(),
                response.status_text(),
            ));
        }

        let token: TokenResponse = serde_json::from_slice(response.body())
            .map_err(|e| Error::token_response(e.to_string()))?;

        let cache = TokenCache::from_response(token, self.clock.now_ms())?;
        debug!(
            "Generated new access token, expires at {}",
            cache
                .expires_at()
                .map_or_else(|| cache.expires_at_ms.to_string(), |t| t.to_rfc3339())
        );

        *self.cache.write().await = cache.clone();
        Ok(cache)
    }

    /// Return the cached token, generating a new one if it is unset or about to expire
    pub async fn get_token(&self) -> Result<String> {
        let cached = self.cache.read().await.clone();

        if cached.needs_refresh(self.clock.now_ms()) {
            return Ok(self.generate_token().await?.token);
        }

        Ok(cached.token)
    }

    /// Snapshot of the current cache
    pub async fn token_cache(&self) -> TokenCache {
        self.cache.read().await.clone()
    }

    /// Token endpoint URL
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn basic_auth_header(&self) -> Result<HeaderValue> {
        let mut value =
            HeaderValue::from_str(&basic_auth_value(&self.credentials)).map_err(|e| {
                Error::invalid_value("client_id", format!("unusable in a header: {e}"))
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

/// `Basic base64(client_id:secret)`
pub fn basic_auth_value(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.client_id, credentials.secret);
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(raw)
    )
}
