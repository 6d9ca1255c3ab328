//! `relay serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use relay_config::{CliSettings, Config};
use relay_server::run_server;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover relay.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Default OAuth callback URI (overrides config).
    #[arg(long)]
    callback: Option<String>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            callback_uri: self.callback,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Print startup info
        output.info(&format!(
            "Starting proxy on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Upstream request-token URI: {}",
            config.oauth.request_token_uri
        ));
        output.info(&format!(
            "Signature method: {}",
            config.oauth.signature_method
        ));

        if config.notify.is_some() {
            output.info("Notifications: enabled");
        } else {
            output.info("Notifications: disabled");
        }

        if config.kms.is_some() {
            output.info("KMS secret decryption: enabled");
        } else {
            output.info("KMS secret decryption: disabled");
        }

        run_server(&config).await?;

        Ok(())
    }
}
