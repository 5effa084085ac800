//! Token cache and token endpoint types

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token is refreshed once it is within this many milliseconds of expiring
pub const REFRESH_MARGIN_MS: i64 = 60_000;

/// Client credentials used for the Basic auth header of the token request
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub secret: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Last token obtained from the token endpoint
///
/// An empty `token` with `expires_at_ms == 0` means no token was ever fetched.
/// The cache is only ever replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenCache {
    /// The bearer token
    pub token: String,
    /// Expiry as epoch milliseconds
    pub expires_at_ms: i64,
}

impl TokenCache {
    /// Create a cache entry
    pub fn new(token: impl Into<String>, expires_at_ms: i64) -> Self {
        Self {
            token: token.into(),
            expires_at_ms,
        }
    }

    /// Build the cache entry for a token response received at `now_ms`
    ///
    /// Fails on a negative lifetime or one that overflows the expiry timestamp.
    pub fn from_response(response: TokenResponse, now_ms: i64) -> Result<Self> {
        if response.expires_in < 0 {
            return Err(Error::token_response(format!(
                "negative expires_in {}",
                response.expires_in
            )));
        }

        let expires_at_ms = response
            .expires_in
            .checked_mul(1000)
            .and_then(|ms| now_ms.checked_add(ms))
            .ok_or_else(|| {
                Error::token_response(format!("expires_in {} is out of range", response.expires_in))
            })?;

        Ok(Self {
            token: response.access_token,
            expires_at_ms,
        })
    }

    /// True if no token was ever fetched
    pub fn is_unset(&self) -> bool {
        self.token.is_empty()
    }

    /// True if the token is unset, expired, or expires within the refresh margin
    pub fn needs_refresh(&self, now_ms: i64) -> bool {
        self.expires_at_ms.saturating_sub(REFRESH_MARGIN_MS) <= now_ms
    }

    /// Expiry as a timestamp, `None` while unset
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.is_unset() {
            return None;
        }
        Utc.timestamp_millis_opt(self.expires_at_ms).single()
    }
}

/// OAuth2 token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The bearer token
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    /// Usually "Bearer"
    #[serde(default)]
    pub token_type: Option<String>,
    /// Space separated scopes granted
    #[serde(default)]
    pub scope: Option<String>,
}
