//! Error types for the OAuth core.

use std::str::Utf8Error;

/// Error from signing or executing OAuth requests.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Consumer key or signing secret is absent. Fatal configuration
    /// error, raised immediately and never retried.
    #[error("missing consumer credentials: {0}")]
    MissingCredentials(&'static str),

    /// HTTP transport failed (network error, timeout, no response).
    #[error("HTTP request failed")]
    Transport(#[from] ureq::Error),

    /// Upstream returned an error status during a token flow; the body is
    /// passed through verbatim.
    #[error("upstream error: {status} - {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body, unmodified.
        body: String,
    },

    /// Malformed request or token response (bad URL, missing oauth
    /// parameters, unreadable body).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// RSA key loading/parsing error.
    #[error("RSA key error")]
    RsaKey(#[from] RsaKeyError),
}

/// RSA key loading/parsing error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RsaKeyError {
    /// I/O error reading the key file.
    #[error("I/O error reading key")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 in key file.
    #[error("invalid UTF-8 in key")]
    InvalidUtf8(#[from] Utf8Error),

    /// PKCS#1 key parsing error (returned when PKCS#8 also failed).
    #[error("PKCS#1 key error")]
    Pkcs1(#[from] rsa::pkcs1::Error),
}
