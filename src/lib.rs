//! # paypal-env
//!
//! Authenticated REST client for the PayPal API.
//!
//! The client obtains an OAuth2 bearer token with the client-credentials
//! grant, caches it until a minute before it expires, attaches it to every
//! request and re-authenticates when the API answers 401.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paypal_env::{AuthenticatedClient, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .client_id("client-id")
//!         .secret("secret")
//!         .sandbox()
//!         .build();
//!
//!     let client = AuthenticatedClient::new(config)?;
//!     let response = client.get("/v2/invoicing/invoices").await?;
//!     println!("{}", response.status());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │             AuthenticatedClient               │
//! │  request(method, path, body) → ApiResponse    │
//! │  401 → generate_token() → resend (bounded)    │
//! └───────────────────────────────────────────────┘
//!            │                         │
//! ┌──────────┴──────────┐   ┌──────────┴──────────┐
//! │    Authenticator    │   │      Transport      │
//! │ TokenCache + Clock  │──▶│ ReqwestTransport    │
//! │ POST /oauth2/token  │   │ send(req) → resp    │
//! └─────────────────────┘   └─────────────────────┘
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types
pub mod types;

/// Client configuration
pub mod config;

/// Time source for token expiry
pub mod clock;

/// OAuth2 client-credentials authentication
pub mod auth;

/// Authenticated HTTP client and transport
pub mod http;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::TokenCache;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{ApiResponse, AuthenticatedClient, Transport};
pub use types::{Environment, Method};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
