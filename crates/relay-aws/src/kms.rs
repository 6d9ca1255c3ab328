//! KMS-backed secret resolution.
//!
//! Configured secrets may be stored as base64 KMS ciphertexts. Resolution
//! degrades gracefully: anything that is not decodable or decryptable is
//! kept as-is (it will simply fail upstream auth later), so a missing key
//! policy never prevents startup.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::error_chain;

/// Decrypts configured secrets via KMS.
#[derive(Clone)]
pub struct SecretResolver {
    client: aws_sdk_kms::Client,
}

impl SecretResolver {
    /// Create a resolver for the given region.
    pub async fn new(region: &str) -> Self {
        let config = crate::sdk_config(region).await;
        Self {
            client: aws_sdk_kms::Client::new(&config),
        }
    }

    /// Resolve one secret value.
    ///
    /// Treats the value as a base64 KMS ciphertext and attempts decryption.
    /// On any failure the raw value is returned unchanged.
    pub async fn resolve(&self, value: &str) -> String {
        let Some(ciphertext) = decode_ciphertext(value) else {
            tracing::debug!("secret is not base64, keeping raw value");
            return value.to_owned();
        };

        match self
            .client
            .decrypt()
            .ciphertext_blob(ciphertext.into())
            .send()
            .await
        {
            Ok(output) => match output.plaintext() {
                Some(blob) => match std::str::from_utf8(blob.as_ref()) {
                    Ok(plaintext) => plaintext.to_owned(),
                    Err(_) => {
                        tracing::warn!("KMS plaintext is not UTF-8, keeping raw value");
                        value.to_owned()
                    }
                },
                None => {
                    tracing::warn!("KMS returned no plaintext, keeping raw value");
                    value.to_owned()
                }
            },
            Err(e) => {
                tracing::warn!(
                    error = %error_chain(&e),
                    "KMS decryption failed, keeping raw value"
                );
                value.to_owned()
            }
        }
    }
}

/// Decode a candidate ciphertext. None means the value is plaintext.
fn decode_ciphertext(value: &str) -> Option<Vec<u8>> {
    BASE64_STANDARD.decode(value).ok()
}
