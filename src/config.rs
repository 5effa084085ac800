//! Client configuration
//!
//! `ClientConfig` is immutable once a client has been built from it. It can be
//! assembled with the builder or loaded from a YAML/JSON file.

use crate::error::{Error, Result, ResultExt};
use crate::types::Environment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default per-request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Default number of re-authentication retries
pub const DEFAULT_MAX_RETRIES: u32 = 5;

const REDACTED: &str = "********";

// ============================================================================
// ClientConfig
// ============================================================================

/// Credentials and connection settings for an `AuthenticatedClient`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OAuth2 client id
    #[serde(default, alias = "clientId")]
    pub client_id: String,

    /// OAuth2 client secret
    #[serde(default)]
    pub secret: String,

    /// Use the live API (true) or the sandbox (false)
    #[serde(default = "default_live")]
    pub live: bool,

    /// Timeout for each individual HTTP call, in milliseconds
    #[serde(default = "default_timeout_ms", alias = "timeout")]
    pub timeout_ms: u64,

    /// How many times a 401 may trigger re-authentication before giving up
    #[serde(default = "default_max_retries", alias = "maxTries")]
    pub max_retries: u32,

    /// Overrides the environment's base URL
    #[serde(default, alias = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent", alias = "userAgent")]
    pub user_agent: String,
}

fn default_live() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_user_agent() -> String {
    format!("paypal-env/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            secret: String::new(),
            live: default_live(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            base_url: None,
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("secret", &REDACTED)
            .field("live", &self.live)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config with the given credentials and default settings
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
            ..Self::default()
        }
    }

    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a config from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Check that the config can be used to build a client
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::missing_field("client_id"));
        }
        if self.secret.is_empty() {
            return Err(Error::missing_field("secret"));
        }
        if self.timeout_ms == 0 {
            return Err(Error::invalid_value(
                "timeout_ms",
                "timeout must be greater than zero",
            ));
        }
        if let Some(base) = &self.base_url {
            url::Url::parse(base)
                .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        }
        Ok(())
    }

    /// Environment selected by the `live` flag
    pub fn environment(&self) -> Environment {
        Environment::from_live(self.live)
    }

    /// Base URL requests are sent to: the override if set, else the environment's
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment().base_url())
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Copy of this config with the secret masked, safe to print
    pub fn redacted(&self) -> Self {
        Self {
            secret: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `ClientConfig`
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the client id
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = client_id.into();
        self
    }

    /// Set the client secret
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.secret = secret.into();
        self
    }

    /// Choose live (true) or sandbox (false)
    pub fn live(mut self, live: bool) -> Self {
        self.config.live = live;
        self
    }

    /// Target the sandbox API
    pub fn sandbox(self) -> Self {
        self.live(false)
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set max re-authentication retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Override the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
