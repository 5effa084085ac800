//! Common types used throughout paypal-env
//!
//! HTTP method and API environment definitions shared by the config layer,
//! the client and the CLI.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    /// Uppercase method name
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            other => Err(Error::invalid_value(
                "method",
                format!("unsupported HTTP method '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Base URL of the live API
pub const LIVE_URL: &str = "https://api-m.paypal.com/v1";

/// Base URL of the sandbox API
pub const SANDBOX_URL: &str = "https://api-m.sandbox.paypal.com/v1";

/// Which API deployment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Production API
    #[default]
    Live,
    /// Sandbox API for testing with fake money
    Sandbox,
}

impl Environment {
    /// Pick the environment from a `live` flag
    pub fn from_live(live: bool) -> Self {
        if live {
            Environment::Live
        } else {
            Environment::Sandbox
        }
    }

    /// Fixed base URL for this environment
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Live => LIVE_URL,
            Environment::Sandbox => SANDBOX_URL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("GET", Method::GET)]
    #[test_case("post", Method::POST)]
    #[test_case("Put", Method::PUT)]
    #[test_case("patch", Method::PATCH)]
    #[test_case("DELETE", Method::DELETE)]
    fn test_method_from_str(input: &str, expected: Method) {
        assert_eq!(input.parse::<Method>().unwrap(), expected);
    }

    #[test]
    fn test_method_from_str_rejects_unknown() {
        let err = "TRACE".parse::<Method>().unwrap_err();
        assert!(err.to_string().contains("TRACE"));
    }

    #[test]
    fn test_method_into_reqwest() {
        assert_eq!(reqwest::Method::from(Method::PATCH), reqwest::Method::PATCH);
        assert_eq!(Method::DELETE.to_string(), "DELETE");
    }

    #[test]
    fn test_environment_base_url() {
        assert_eq!(Environment::from_live(true), Environment::Live);
        assert_eq!(Environment::from_live(false), Environment::Sandbox);
        assert_eq!(Environment::Live.base_url(), LIVE_URL);
        assert_eq!(Environment::Sandbox.base_url(), SANDBOX_URL);
        assert_eq!(Environment::default(), Environment::Live);
    }
}
