//! Transport abstraction
//!
//! The client only needs `send(request) -> response`. `ReqwestTransport` is
//! the production implementation; tests and embedders can plug in their own.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::Method;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// An outgoing HTTP request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Raw request body
    pub body: Option<String>,
}

impl TransportRequest {
    /// Create a request with no headers and no body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing any previous value
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A fully buffered HTTP response, returned to callers untranslated
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Create a response
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason phrase for the status, empty if unknown
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// True for 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Black-box HTTP capability
///
/// Connection-level failures are returned as errors; every HTTP status,
/// including 4xx and 5xx, is a successful `ApiResponse`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and buffer the response
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse>;
}

/// Transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client using the config's timeout and user agent
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<ApiResponse> {
        let mut req = self
            .client
            .request(request.method.into(), &request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(Error::Http)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::Http)?;

        Ok(ApiResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod transport_tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    #[test]
    fn test_transport_request_builder() {
        let req = TransportRequest::new(Method::POST, "https://example.com/x")
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body("{}");

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "https://example.com/x");
        assert_eq!(req.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_api_response_helpers() {
        let response = ApiResponse::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            HeaderMap::new(),
            r#"{"name": "INVALID_REQUEST"}"#,
        );

        assert!(!response.is_success());
        assert_eq!(response.status_text(), "Unprocessable Entity");
        assert_eq!(response.text(), r#"{"name": "INVALID_REQUEST"}"#);

        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["name"], "INVALID_REQUEST");
    }

    #[test]
    fn test_api_response_json_error() {
        let response = ApiResponse::new(StatusCode::OK, HeaderMap::new(), "not json");
        assert!(matches!(
            response.json::<serde_json::Value>(),
            Err(Error::JsonParse(_))
        ));
    }
}
