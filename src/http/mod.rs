//! HTTP client module
//!
//! Provides the authenticated client and the transport it sends through.
//!
//! # Features
//!
//! - **Bearer auth**: every request carries the cached OAuth2 token
//! - **Re-authentication**: a 401 forces a new token and resends, bounded by `max_retries`
//! - **Pluggable transport**: reqwest by default, any `Transport` implementation otherwise

mod client;
mod transport;

pub use client::AuthenticatedClient;
pub use transport::{ApiResponse, ReqwestTransport, Transport, TransportRequest};
