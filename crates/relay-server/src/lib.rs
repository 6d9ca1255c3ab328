//! HTTP surface for the OAuth 1.0a signing proxy.
//!
//! One route per proxied operation:
//! - `POST /auth/request-token` - first leg of the token flow
//! - `POST /auth/access-token` - third leg (verifier exchange)
//! - `GET/POST/DELETE /proxy` - signed resource requests
//!
//! Upstream HTTP work is blocking (`ureq`), so handlers run it under
//! `spawn_blocking`; the async side owns routing, notifications, and
//! shutdown.
//!
//! # Quick Start
//!
//! ```ignore
//! use relay_config::Config;
//! use relay_server::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load(None, None).unwrap();
//!     run_server(&config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod responses;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;

use relay_aws::{Notifier, SecretResolver};
use relay_config::{Config, OAuthConfig};
use relay_oauth::{
    Credentials, FlowClient, FlowEndpoints, SignatureMethod, SignedClient,
    load_private_key_from_file,
};
use state::AppState;

pub use error::ServerError;

/// Run the server.
///
/// Resolves secrets, builds the OAuth clients, and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if credentials cannot be built or the listener fails
/// to bind.
pub async fn run_server(config: &Config) -> Result<(), ServerError> {
    let consumer_secret = resolve_consumer_secret(config).await;
    let credentials = build_credentials(&config.oauth, &consumer_secret)?;

    let notifier = match &config.notify {
        Some(notify) => {
            Notifier::new(
                &notify.region,
                &notify.success_topic_arn,
                &notify.failure_topic_arn,
            )
            .await
        }
        None => Notifier::disabled(),
    };

    let state = AppState {
        flow: FlowClient::new(credentials.clone(), flow_endpoints(&config.oauth)),
        signed: SignedClient::new(
            credentials,
            config
                .oauth
                .custom_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            config.oauth.content_type.clone(),
        ),
        notifier,
    };

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.server.host, config.server.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Decrypt the configured consumer secret when a `[kms]` section is present.
///
/// Degrades gracefully: any resolution failure keeps the raw value.
pub async fn resolve_consumer_secret(config: &Config) -> String {
    match &config.kms {
        Some(kms) => {
            SecretResolver::new(&kms.region)
                .await
                .resolve(&config.oauth.consumer_secret)
                .await
        }
        None => config.oauth.consumer_secret.clone(),
    }
}

/// Build signing credentials from configuration.
///
/// # Errors
///
/// Returns an error if the RSA key cannot be loaded or a credential field
/// is empty.
pub fn build_credentials(
    oauth: &OAuthConfig,
    consumer_secret: &str,
) -> Result<Credentials, ServerError> {
    let method = if oauth.signature_method == "RSA-SHA1" {
        // Validation guarantees the key file is set for RSA-SHA1.
        let path = oauth.private_key_file.as_deref().ok_or_else(|| {
            relay_config::ConfigError::Validation(
                "oauth.private_key_file is required for RSA-SHA1".to_owned(),
            )
        })?;
        SignatureMethod::RsaSha1 {
            private_key: Box::new(load_private_key_from_file(path)?),
        }
    } else {
        SignatureMethod::HmacSha1 {
            consumer_secret: consumer_secret.to_owned(),
        }
    };

    Ok(Credentials::new(oauth.consumer_key.clone(), method)?)
}

/// Flow endpoints from configuration.
#[must_use]
pub fn flow_endpoints(oauth: &OAuthConfig) -> FlowEndpoints {
    FlowEndpoints {
        request_token_uri: oauth.request_token_uri.clone(),
        access_token_uri: oauth.access_token_uri.clone(),
        authorize_uri: oauth.authorize_uri.clone(),
        default_callback: oauth.callback_uri.clone(),
    }
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
