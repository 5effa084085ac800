//! Authentication module
//!
//! OAuth2 client-credentials flow against the API's token endpoint.
//!
//! The `Authenticator` owns the token cache: `get_token` reuses the cached
//! token until it is within a minute of expiry, `generate_token` always asks
//! the endpoint for a new one.

mod authenticator;
mod types;

pub use authenticator::{
    basic_auth_value, Authenticator, CLIENT_CREDENTIALS_BODY, OAUTH_TOKEN_PATH,
};
pub use types::{Credentials, TokenCache, TokenResponse, REFRESH_MARGIN_MS};

#[cfg(test)]
mod tests;
