//! OAuth 1.0a signature generation (RFC 5849).
//!
//! Everything here is pure and synchronous; network suspension happens in
//! the callers, never during signature computation.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};
use rand::RngExt;
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha1::Sha1;

use crate::error::OAuthError;

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Protocol version emitted as `oauth_version`.
const OAUTH_VERSION: &str = "1.0";

/// Percent-encode string per RFC 3986.
pub fn oauth_encode(input: &str) -> String {
    percent_encode(input.as_bytes(), OAUTH_ENCODE_SET).to_string()
}

/// Generate cryptographically random nonce (32 hex characters).
fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// Generate Unix timestamp.
fn generate_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        .to_string()
}

/// Signature method for the `oauth_signature_method` parameter.
#[derive(Clone)]
pub enum SignatureMethod {
    /// HMAC-SHA1 keyed with `enc(consumer_secret)&enc(token_secret)`.
    HmacSha1 {
        /// Consumer secret; the token secret half of the key comes from the
        /// request being signed.
        consumer_secret: String,
    },
    /// RSA-SHA1 (PKCS#1 v1.5). The token secret does not participate.
    RsaSha1 {
        /// RSA private key, loaded via [`crate::key`].
        private_key: Box<RsaPrivateKey>,
    },
}

impl SignatureMethod {
    /// Wire name of the method.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::HmacSha1 { .. } => "HMAC-SHA1",
            Self::RsaSha1 { .. } => "RSA-SHA1",
        }
    }
}

impl fmt::Debug for SignatureMethod {
    // Never prints key material.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Consumer identity plus the method used to sign requests.
///
/// Loaded once at startup, immutable afterwards.
#[derive(Debug, Clone)]
pub struct Credentials {
    consumer_key: String,
    method: SignatureMethod,
}

impl Credentials {
    /// Create credentials, rejecting absent key material.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::MissingCredentials`] when the consumer key is
    /// empty, or when HMAC-SHA1 is selected with an empty consumer secret.
    /// This is the only way signing can fail.
    pub fn new(
        consumer_key: impl Into<String>,
        method: SignatureMethod,
    ) -> Result<Self, OAuthError> {
        let consumer_key = consumer_key.into();
        if consumer_key.is_empty() {
            return Err(OAuthError::MissingCredentials("consumer key"));
        }
        if let SignatureMethod::HmacSha1 { consumer_secret } = &method
            && consumer_secret.is_empty()
        {
            return Err(OAuthError::MissingCredentials("consumer secret"));
        }
        Ok(Self {
            consumer_key,
            method,
        })
    }

    /// The consumer key.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }
}

/// Everything that participates in one signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignContext<'a> {
    /// HTTP method (uppercased in the base string).
    pub method: &'a str,
    /// URL without query string (`scheme://host/path`, RFC 5849 §3.4.1.2).
    pub base_url: &'a str,
    /// Query parameters included in the signature (decoded values).
    pub query_params: &'a [(String, String)],
    /// `oauth_token` (request or access token; absent on the first leg).
    pub token: Option<&'a str>,
    /// Token secret paired with `token` (HMAC only).
    pub token_secret: Option<&'a str>,
    /// `oauth_callback` (first leg only).
    pub callback: Option<&'a str>,
    /// `oauth_verifier` (third leg only).
    pub verifier: Option<&'a str>,
}

/// Build OAuth signature base string per RFC 5849 §3.4.1.
///
/// Parameters are encoded first, then sorted lexicographically by encoded
/// key and value, so duplicate keys are ordered deterministically. The
/// result is stable under re-serialization.
pub fn build_signature_base_string(
    method: &str,
    base_url: &str,
    params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(base_url),
        oauth_encode(&param_string)
    )
}

/// Sign a base string, returning the base64 signature.
fn sign_base_string(method: &SignatureMethod, token_secret: Option<&str>, base: &str) -> String {
    match method {
        SignatureMethod::HmacSha1 { consumer_secret } => {
            let key = format!(
                "{}&{}",
                oauth_encode(consumer_secret),
                oauth_encode(token_secret.unwrap_or(""))
            );
            // HMAC accepts keys of any length.
            let mut mac =
                Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC key length is unbounded");
            mac.update(base.as_bytes());
            BASE64_STANDARD.encode(mac.finalize().into_bytes())
        }
        SignatureMethod::RsaSha1 { private_key } => {
            let signing_key = SigningKey::<Sha1>::new((**private_key).clone());
            let signature = signing_key.sign(base.as_bytes());
            BASE64_STANDARD.encode(signature.to_bytes())
        }
    }
}

/// Compute the full OAuth parameter set for a request, including the
/// signature, with a fresh nonce and current timestamp.
///
/// # Errors
///
/// Fails only via [`Credentials::new`] invariants being violated upstream;
/// kept as `Result` so callers treat signing uniformly.
pub fn oauth_parameters(
    credentials: &Credentials,
    ctx: &SignContext<'_>,
) -> Result<BTreeMap<String, String>, OAuthError> {
    oauth_parameters_with(credentials, ctx, &generate_nonce(), &generate_timestamp())
}

/// [`oauth_parameters`] with caller-supplied nonce and timestamp.
fn oauth_parameters_with(
    credentials: &Credentials,
    ctx: &SignContext<'_>,
    nonce: &str,
    timestamp: &str,
) -> Result<BTreeMap<String, String>, OAuthError> {
    let mut oauth_params = BTreeMap::new();
    oauth_params.insert(
        "oauth_consumer_key".to_owned(),
        credentials.consumer_key.clone(),
    );
    oauth_params.insert("oauth_nonce".to_owned(), nonce.to_owned());
    oauth_params.insert(
        "oauth_signature_method".to_owned(),
        credentials.method.label().to_owned(),
    );
    oauth_params.insert("oauth_timestamp".to_owned(), timestamp.to_owned());
    oauth_params.insert("oauth_version".to_owned(), OAUTH_VERSION.to_owned());

    if let Some(token) = ctx.token {
        oauth_params.insert("oauth_token".to_owned(), token.to_owned());
    }
    if let Some(callback) = ctx.callback {
        oauth_params.insert("oauth_callback".to_owned(), callback.to_owned());
    }
    if let Some(verifier) = ctx.verifier {
        oauth_params.insert("oauth_verifier".to_owned(), verifier.to_owned());
    }

    // Signature params: OAuth params + query params (RFC 5849 §3.4.1.3).
    // Query params may duplicate keys, so a Vec rather than a map.
    let mut signature_params: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    signature_params.extend(ctx.query_params.iter().cloned());

    let base_string = build_signature_base_string(ctx.method, ctx.base_url, &signature_params);
    let signature = sign_base_string(&credentials.method, ctx.token_secret, &base_string);
    oauth_params.insert("oauth_signature".to_owned(), signature);

    Ok(oauth_params)
}

/// Build OAuth Authorization header from OAuth params.
#[must_use]
pub fn authorization_header(oauth_params: &BTreeMap<String, String>) -> String {
    let header_parts: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, oauth_encode(v)))
        .collect();
    format!("OAuth {}", header_parts.join(", "))
}

/// Sign a request and emit the `Authorization` header value in one step.
///
/// # Errors
///
/// See [`oauth_parameters`].
pub fn create_authorization_header(
    credentials: &Credentials,
    ctx: &SignContext<'_>,
) -> Result<String, OAuthError> {
    Ok(authorization_header(&oauth_parameters(credentials, ctx)?))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn hmac_credentials() -> Credentials {
        Credentials::new(
            "test_key",
            SignatureMethod::HmacSha1 {
                consumer_secret: "test_secret".to_owned(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_oauth_encode_unreserved() {
        assert_eq!(oauth_encode("abc123"), "abc123");
        assert_eq!(oauth_encode("ABC"), "ABC");
        assert_eq!(oauth_encode("-._~"), "-._~");
    }

    #[test]
    fn test_oauth_encode_reserved() {
        assert_eq!(oauth_encode(" "), "%20");
        assert_eq!(oauth_encode("&"), "%26");
        assert_eq!(oauth_encode("="), "%3D");
        assert_eq!(oauth_encode("/"), "%2F");
    }

    #[test]
    fn test_nonce_uniqueness() {
        let nonce1 = generate_nonce();
        let nonce2 = generate_nonce();
        assert_ne!(nonce1, nonce2);
        assert_eq!(nonce1.len(), 32);
    }

    #[test]
    fn test_base_string_is_stable() {
        let params = vec![
            ("oauth_consumer_key".to_owned(), "test_key".to_owned()),
            ("oauth_nonce".to_owned(), "123456".to_owned()),
        ];
        let first = build_signature_base_string("get", "https://example.com/api", &params);
        let second = build_signature_base_string("get", "https://example.com/api", &params);

        assert_eq!(first, second);
        assert!(first.starts_with("GET&"));
        assert!(first.contains("https%3A%2F%2Fexample.com%2Fapi"));
    }

    #[test]
    fn test_base_string_orders_duplicate_keys_by_value() {
        let params = vec![
            ("b".to_owned(), "2".to_owned()),
            ("a".to_owned(), "1".to_owned()),
            ("a".to_owned(), "0".to_owned()),
        ];
        let base = build_signature_base_string("GET", "https://example.com/", &params);

        // a=0 before a=1 before b=2, doubly encoded inside the base string.
        assert!(base.ends_with(&oauth_encode("a=0&a=1&b=2")));
    }

    // Known-answer vector from the OAuth 1.0a specification appendix
    // (photos.example.net).
    #[test]
    fn test_hmac_sha1_known_vector() {
        let params: Vec<(String, String)> = [
            ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
            ("oauth_token", "nnch734d00sl2jdk"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1191242096"),
            ("oauth_nonce", "kllo9940pd9333jh"),
            ("oauth_version", "1.0"),
            ("file", "vacation.jpg"),
            ("size", "original"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();

        let base =
            build_signature_base_string("GET", "http://photos.example.net/photos", &params);
        assert_eq!(
            base,
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26\
             oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26\
             oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );

        let method = SignatureMethod::HmacSha1 {
            consumer_secret: "kd94hf93k423kf44".to_owned(),
        };
        let signature = sign_base_string(&method, Some("pfkkdhi9sl3r4s00"), &base);
        assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_signing_without_token_secret_uses_consumer_secret_only() {
        let method = SignatureMethod::HmacSha1 {
            consumer_secret: "secret".to_owned(),
        };
        let with_empty = sign_base_string(&method, None, "GET&a&b");
        let with_explicit_empty = sign_base_string(&method, Some(""), "GET&a&b");
        assert_eq!(with_empty, with_explicit_empty);

        let with_token_secret = sign_base_string(&method, Some("tsec"), "GET&a&b");
        assert_ne!(with_empty, with_token_secret);
    }

    #[test]
    fn test_fresh_nonce_changes_signature() {
        let credentials = hmac_credentials();
        let ctx = SignContext {
            method: "GET",
            base_url: "https://api.example.com/resource",
            token: Some("tok"),
            token_secret: Some("sec"),
            ..SignContext::default()
        };

        let first = oauth_parameters(&credentials, &ctx).unwrap();
        let second = oauth_parameters(&credentials, &ctx).unwrap();

        assert_ne!(first["oauth_nonce"], second["oauth_nonce"]);
        assert_ne!(first["oauth_signature"], second["oauth_signature"]);
    }

    #[test]
    fn test_deterministic_with_fixed_nonce_and_timestamp() {
        let credentials = hmac_credentials();
        let ctx = SignContext {
            method: "GET",
            base_url: "https://api.example.com/resource",
            token: Some("tok"),
            token_secret: Some("sec"),
            ..SignContext::default()
        };

        let first = oauth_parameters_with(&credentials, &ctx, "nonce", "1191242096").unwrap();
        let second = oauth_parameters_with(&credentials, &ctx, "nonce", "1191242096").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_leg_params_carry_callback_without_token() {
        let credentials = hmac_credentials();
        let header = create_authorization_header(
            &credentials,
            &SignContext {
                method: "POST",
                base_url: "https://example.com/oauth/request-token",
                callback: Some("https://app/cb"),
                ..SignContext::default()
            },
        )
        .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_callback=\"https%3A%2F%2Fapp%2Fcb\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(!header.contains("oauth_token="));
        assert!(!header.contains("oauth_verifier"));
    }

    #[test]
    fn test_third_leg_params_carry_token_and_verifier() {
        let credentials = hmac_credentials();
        let header = create_authorization_header(
            &credentials,
            &SignContext {
                method: "POST",
                base_url: "https://example.com/oauth/access-token",
                token: Some("request_token"),
                token_secret: Some("request_secret"),
                verifier: Some("verifier_code"),
                ..SignContext::default()
            },
        )
        .unwrap();

        assert!(header.contains("oauth_token=\"request_token\""));
        assert!(header.contains("oauth_verifier=\"verifier_code\""));
        assert!(!header.contains("oauth_callback"));
    }

    #[test]
    fn test_empty_consumer_key_is_fatal() {
        let result = Credentials::new(
            "",
            SignatureMethod::HmacSha1 {
                consumer_secret: "secret".to_owned(),
            },
        );
        assert!(matches!(
            result,
            Err(OAuthError::MissingCredentials("consumer key"))
        ));
    }

    #[test]
    fn test_empty_consumer_secret_is_fatal() {
        let result = Credentials::new(
            "key",
            SignatureMethod::HmacSha1 {
                consumer_secret: String::new(),
            },
        );
        assert!(matches!(
            result,
            Err(OAuthError::MissingCredentials("consumer secret"))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_secrets() {
        let credentials = hmac_credentials();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("test_secret"));
    }
}
