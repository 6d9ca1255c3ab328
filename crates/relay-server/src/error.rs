//! Server error type.

use std::net::AddrParseError;

/// Error returned by server startup.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid bind address.
    #[error("Invalid bind address: {0}")]
    Addr(#[from] AddrParseError),
    /// I/O error while binding or serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// RSA private key could not be loaded.
    #[error("Private key error: {0}")]
    Key(#[from] relay_oauth::RsaKeyError),
    /// Credential construction failed.
    #[error("OAuth error: {0}")]
    OAuth(#[from] relay_oauth::OAuthError),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] relay_config::ConfigError),
}
