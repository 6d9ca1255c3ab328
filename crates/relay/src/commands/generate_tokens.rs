//! `relay generate-tokens` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use relay_config::{CliSettings, Config};
use relay_oauth::FlowClient;
use relay_server::{build_credentials, flow_endpoints, resolve_consumer_secret};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate-tokens command.
#[derive(Args)]
pub(crate) struct GenerateTokensArgs {
    /// Path to configuration file (default: auto-discover relay.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Callback URI for the request-token leg (default: from config).
    #[arg(long)]
    callback: Option<String>,
}

impl GenerateTokensArgs {
    /// Execute the generate-tokens command.
    ///
    /// # Errors
    ///
    /// Returns an error if token generation fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Load config
        let cli_settings = CliSettings {
            callback_uri: self.callback,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Resolve the consumer secret (KMS decryption when configured)
        let consumer_secret = if config.kms.is_some() {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(resolve_consumer_secret(&config))
        } else {
            config.oauth.consumer_secret.clone()
        };

        let credentials = build_credentials(&config.oauth, &consumer_secret)?;
        let client = FlowClient::new(credentials, flow_endpoints(&config.oauth));

        // Step 1: Get request token
        output.info("Step 1: Requesting temporary credentials...");
        let request_token = client.request_token(None)?;
        output.success("Temporary token received");

        // Step 2: User authorization
        output.banner("Step 2: Authorization Required");
        if let Some(auth_url) = client.authorization_url(&request_token) {
            output.info("\nPlease open this URL in your browser:");
            output.highlight(&format!("\n{auth_url}\n"));
        } else {
            output.warning(
                "\nNo authorize URI configured; authorize the request token \
                 with your provider, then continue.",
            );
        }

        // Read verifier from stdin
        write!(io::stdout(), "Enter the verification code: ")?;
        io::stdout().flush()?;
        let mut verifier = String::new();
        io::stdin().read_line(&mut verifier)?;
        let verifier = verifier.trim();

        // Step 3: Exchange for access token
        output.info("\nStep 3: Exchanging for access token...");
        let access_token = client.exchange_verifier(
            &request_token.oauth_token,
            &request_token.oauth_token_secret,
            verifier,
        )?;

        // Output results
        output.separator();
        output.success("OAuth Authorization Successful!");
        output.separator();
        output.info("\nPass these credentials on proxy calls:");
        output.info(&format!(r#"accessToken = "{}""#, access_token.oauth_token));
        output.info(&format!(
            r#"accessTokenSecret = "{}""#,
            access_token.oauth_token_secret
        ));

        Ok(())
    }
}
