//! Signed ad-hoc resource requests (GET/POST/DELETE).
//!
//! Wraps one HTTP call with a fresh OAuth signature. Outcomes are tagged
//! rather than duck-typed: a non-2xx upstream status resolves to
//! [`FetchOutcome::HttpStatus`] with human-readable text, while transport
//! failures (no response at all) are `Err`. Transport errors take
//! precedence over status text.

use std::time::Duration;

use percent_encoding::percent_decode_str;
use ureq::Agent;
use ureq::http::Uri;

use crate::error::OAuthError;
use crate::signature::{Credentials, SignContext, create_authorization_header};
use crate::status::status_text;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Header instructing the upstream API to return an unpaginated result set.
const NO_PAGING_HEADER: &str = "No_Paging";

/// Access token pair used to sign resource calls. Caller-supplied per
/// request; never stored.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Access token.
    pub token: String,
    /// Access token secret.
    pub secret: String,
}

/// Options for signed GET requests.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Fetch all pages: merges `No_Paging: true` into the request headers.
    pub all_data: bool,
}

/// Outcome of one signed request that produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Status in [200,300): upstream body, verbatim. Response headers are
    /// captured for POST (needed to propagate `Location`).
    Success {
        /// Upstream response body, unchanged.
        body: String,
        /// Response headers (lowercase names); empty unless captured.
        headers: Vec<(String, String)>,
    },
    /// Status outside [200,300): resolved, not failed, so callers can
    /// branch without exception handling.
    HttpStatus {
        /// Upstream status code.
        code: u16,
        /// Human-readable status text.
        text: String,
    },
}

/// Signed request executor.
///
/// Stateless across calls: every request gets a fresh nonce and timestamp.
#[derive(Clone)]
pub struct SignedClient {
    agent: Agent,
    credentials: Credentials,
    custom_headers: Vec<(String, String)>,
    content_type: String,
}

impl SignedClient {
    /// Create an executor.
    ///
    /// `custom_headers` are attached to every outbound request (e.g. a
    /// vendor `Accept` header); `content_type` is used for POST bodies.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        custom_headers: Vec<(String, String)>,
        content_type: impl Into<String>,
    ) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            credentials,
            custom_headers,
            content_type: content_type.into(),
        }
    }

    /// Execute a signed GET.
    ///
    /// # Errors
    ///
    /// Transport failures only; upstream statuses always resolve.
    pub fn get(
        &self,
        url: &str,
        token: &TokenPair,
        options: &GetOptions,
    ) -> Result<FetchOutcome, OAuthError> {
        let auth_header = self.sign("GET", url, token)?;

        let mut request = self.agent.get(url).header("Authorization", &auth_header);
        for (name, value) in &self.custom_headers {
            request = request.header(name, value);
        }
        if options.all_data {
            request = request.header(NO_PAGING_HEADER, "true");
        }

        let response = request.call()?;
        Self::resolve(response, false)
    }

    /// Execute a signed POST with the configured content type.
    ///
    /// On success the response headers are returned so the caller can
    /// propagate `Location` from created-resource responses.
    ///
    /// # Errors
    ///
    /// Transport failures only; upstream statuses always resolve.
    pub fn post(
        &self,
        url: &str,
        token: &TokenPair,
        body: &str,
    ) -> Result<FetchOutcome, OAuthError> {
        let auth_header = self.sign("POST", url, token)?;

        let mut request = self
            .agent
            .post(url)
            .header("Authorization", &auth_header)
            .header("Content-Type", &self.content_type);
        for (name, value) in &self.custom_headers {
            request = request.header(name, value);
        }

        let response = request.send(body.as_bytes())?;
        Self::resolve(response, true)
    }

    /// Execute a signed DELETE.
    ///
    /// # Errors
    ///
    /// Transport failures only; upstream statuses always resolve.
    pub fn delete(&self, url: &str, token: &TokenPair) -> Result<FetchOutcome, OAuthError> {
        let auth_header = self.sign("DELETE", url, token)?;

        let mut request = self.agent.delete(url).header("Authorization", &auth_header);
        for (name, value) in &self.custom_headers {
            request = request.header(name, value);
        }

        let response = request.call()?;
        Self::resolve(response, false)
    }

    /// Compute the `Authorization` header for one call.
    ///
    /// The base URL excludes the query string (RFC 5849 §3.4.1.2); query
    /// parameters are decoded and fed into the signature separately
    /// (§3.4.1.3).
    fn sign(&self, method: &str, url: &str, token: &TokenPair) -> Result<String, OAuthError> {
        let uri: Uri = url
            .parse()
            .map_err(|_| OAuthError::Protocol(format!("invalid URL: {url}")))?;

        // Authority keeps any explicit port, which participates in the
        // signature base URL.
        let base_url = format!(
            "{}://{}{}",
            uri.scheme_str().unwrap_or("https"),
            uri.authority().map_or("", |a| a.as_str()),
            uri.path()
        );

        let query_params: Vec<(String, String)> = uri
            .query()
            .map(|q| {
                q.split('&')
                    .filter_map(|param| {
                        let mut parts = param.splitn(2, '=');
                        let key = parts.next()?;
                        let value = parts.next().unwrap_or("");
                        Some((
                            percent_decode_str(key).decode_utf8_lossy().into_owned(),
                            percent_decode_str(value).decode_utf8_lossy().into_owned(),
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default();

        create_authorization_header(
            &self.credentials,
            &SignContext {
                method,
                base_url: &base_url,
                query_params: &query_params,
                token: Some(&token.token),
                token_secret: Some(&token.secret),
                ..SignContext::default()
            },
        )
    }

    /// Map an HTTP response onto a tagged outcome.
    fn resolve(
        response: ureq::http::Response<ureq::Body>,
        capture_headers: bool,
    ) -> Result<FetchOutcome, OAuthError> {
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            tracing::debug!(status, "upstream returned non-success status");
            return Ok(FetchOutcome::HttpStatus {
                code: status,
                text: status_text(status).into_owned(),
            });
        }

        let headers = if capture_headers {
            response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_owned(), v.to_owned()))
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut body_reader = response.into_body();
        let body = body_reader
            .read_to_string()
            .map_err(|e| OAuthError::Protocol(format!("failed to read response body: {e}")))?;

        Ok(FetchOutcome::Success { body, headers })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::signature::SignatureMethod;
    use crate::testutil;

    fn client() -> SignedClient {
        let credentials = Credentials::new(
            "consumer_key",
            SignatureMethod::HmacSha1 {
                consumer_secret: "consumer_secret".to_owned(),
            },
        )
        .unwrap();
        SignedClient::new(
            credentials,
            vec![("Accept".to_owned(), "application/json".to_owned())],
            "application/json",
        )
    }

    fn token() -> TokenPair {
        TokenPair {
            token: "tok".to_owned(),
            secret: "sec".to_owned(),
        }
    }

    #[test]
    fn test_get_success_returns_body_verbatim() {
        let (base, rx) = testutil::serve_once(200, "OK", &[], "{\"a\":1}");
        let url = format!("{base}/resource");

        let outcome = client()
            .get(&url, &token(), &GetOptions::default())
            .unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::Success {
                body: "{\"a\":1}".to_owned(),
                headers: Vec::new(),
            }
        );

        // Exactly one request, signed with the access token.
        let request = rx.recv().unwrap();
        assert!(request.starts_with("GET /resource"));
        assert!(request.contains("oauth_token=\"tok\""));
        assert!(request.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(request.contains("accept: application/json") || request.contains("Accept: application/json"));
    }

    #[test]
    fn test_get_all_data_adds_no_paging_header() {
        let (base, rx) = testutil::serve_once(200, "OK", &[], "[]");
        let url = format!("{base}/resource");

        client()
            .get(&url, &token(), &GetOptions { all_data: true })
            .unwrap();

        let request = rx.recv().unwrap();
        let lower = request.to_lowercase();
        assert!(lower.contains("no_paging: true"));
    }

    #[test]
    fn test_get_without_all_data_has_no_paging_header() {
        let (base, rx) = testutil::serve_once(200, "OK", &[], "[]");
        let url = format!("{base}/resource");

        client()
            .get(&url, &token(), &GetOptions::default())
            .unwrap();

        let request = rx.recv().unwrap();
        assert!(!request.to_lowercase().contains("no_paging"));
    }

    #[test]
    fn test_query_params_participate_in_signature() {
        let (base, rx) = testutil::serve_once(200, "OK", &[], "[]");
        let url = format!("{base}/resource?page=2&q=hello%20world");

        client()
            .get(&url, &token(), &GetOptions::default())
            .unwrap();

        // The request goes out with the original query intact, signed.
        let request = rx.recv().unwrap();
        assert!(request.starts_with("GET /resource?page=2&q=hello%20world"));
        assert!(request.contains("oauth_signature=\""));
    }

    #[test]
    fn test_non_success_status_resolves_with_status_text() {
        let (base, _rx) = testutil::serve_once(404, "Not Found", &[], "ignored");
        let url = format!("{base}/resource");

        let outcome = client().delete(&url, &token()).unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::HttpStatus {
                code: 404,
                text: "Not Found".to_owned(),
            }
        );
    }

    #[test]
    fn test_unknown_status_resolves_with_fallback_text() {
        let (base, _rx) = testutil::serve_once(599, "Whatever", &[], "");
        let url = format!("{base}/resource");

        let outcome = client()
            .get(&url, &token(), &GetOptions::default())
            .unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::HttpStatus {
                code: 599,
                text: "Status code does not exist: 599".to_owned(),
            }
        );
    }

    #[test]
    fn test_transport_failure_rejects_with_error() {
        let base = testutil::dead_endpoint();
        let url = format!("{base}/resource");

        let err = client()
            .get(&url, &token(), &GetOptions::default())
            .unwrap_err();

        assert!(matches!(err, OAuthError::Transport(_)));
    }

    #[test]
    fn test_post_returns_headers_for_location_propagation() {
        let (base, rx) = testutil::serve_once(
            201,
            "Created",
            &[("Location", "https://api.example.com/resource/42")],
            "created",
        );
        let url = format!("{base}/resource");

        let outcome = client().post(&url, &token(), "{\"name\":\"x\"}").unwrap();

        match outcome {
            FetchOutcome::Success { body, headers } => {
                assert_eq!(body, "created");
                assert!(headers.iter().any(|(name, value)| name == "location"
                    && value == "https://api.example.com/resource/42"));
            }
            other => panic!("expected Success, got {other:?}"),
        }

        let request = rx.recv().unwrap();
        assert!(request.starts_with("POST /resource"));
        let lower = request.to_lowercase();
        assert!(lower.contains("content-type: application/json"));
        assert!(request.contains("{\"name\":\"x\"}"));
    }

    #[test]
    fn test_invalid_url_is_a_protocol_error() {
        let err = client()
            .get("not a url", &token(), &GetOptions::default())
            .unwrap_err();
        assert!(matches!(err, OAuthError::Protocol(_)));
    }
}
