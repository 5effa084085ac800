//! CLI module
//!
//! Command-line interface around `AuthenticatedClient`.
//!
//! # Commands
//!
//! - `token` - Fetch a new access token
//! - `request` - Send an authenticated request
//! - `config` - Show the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
