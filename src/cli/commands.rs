//! CLI commands and argument parsing

use crate::types::Method;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PayPal REST client with OAuth2 token handling
#[derive(Parser, Debug)]
#[command(name = "paypal-env")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// OAuth2 client id
    #[arg(long, global = true, env = "PAYPAL_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[arg(long, global = true, env = "PAYPAL_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Use the sandbox API instead of the live one
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Re-authentication retries on 401
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a new access token and print it
    Token,

    /// Send an authenticated request and print the response
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: Method,

        /// Path relative to the API base URL, or an absolute URL
        path: String,

        /// Inline JSON body
        #[arg(long)]
        body: Option<String>,
    },

    /// Show the effective configuration (secret redacted)
    Config,
}
