//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::AuthenticatedClient;
use crate::types::Method;
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Token => self.token().await,
            Commands::Request { method, path, body } => {
                self.request(*method, path, body.as_deref()).await
            }
            Commands::Config => self.show_config(),
        }
    }

    /// Config file (if any) with command-line flags layered on top
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(client_id) = &self.cli.client_id {
            config.client_id.clone_from(client_id);
        }
        if let Some(secret) = &self.cli.secret {
            config.secret.clone_from(secret);
        }
        if self.cli.sandbox {
            config.live = false;
        }
        if let Some(base_url) = &self.cli.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(timeout_ms) = self.cli.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(max_retries) = self.cli.max_retries {
            config.max_retries = max_retries;
        }

        Ok(config)
    }

    fn client(&self) -> Result<AuthenticatedClient> {
        let config = self.resolve_config()?;
        info!(
            "Using {:?} environment at {}",
            config.environment(),
            config.resolved_base_url()
        );
        AuthenticatedClient::new(config)
    }

    async fn token(&self) -> Result<()> {
        let client = self.client()?;
        let cache = client.generate_token().await?;

        let output = json!({
            "token": cache.token,
            "expires_at": cache.expires_at().map(|t| t.to_rfc3339()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    async fn request(&self, method: Method, path: &str, body: Option<&str>) -> Result<()> {
        let body: Option<Value> = body.map(serde_json::from_str).transpose()?;
        let client = self.client()?;

        let response = client.request(method, path, body.as_ref()).await?;
        println!("{} {}", response.status().as_u16(), response.status_text());

        match response.json::<Value>() {
            Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            Err(_) => {
                let text = response.text();
                if !text.is_empty() {
                    println!("{text}");
                }
            }
        }
        Ok(())
    }

    fn show_config(&self) -> Result<()> {
        let config = self.resolve_config()?;
        println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        Ok(())
    }
}
