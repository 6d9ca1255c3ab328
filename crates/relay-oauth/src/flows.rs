//! Three-legged OAuth 1.0a token flows.
//!
//! Two independent flows, each completing exactly once per invocation:
//! the request-token leg (first leg) and the access-token exchange (third
//! leg). The second leg is a user redirect; [`FlowClient::authorization_url`]
//! builds the URL when the upstream exposes an authorize endpoint.
//!
//! Upstream errors are surfaced verbatim ([`OAuthError::Upstream`]) and
//! never retried.

use std::collections::HashMap;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use ureq::Agent;

use crate::error::OAuthError;
use crate::signature::{Credentials, SignContext, create_authorization_header};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Temporary credentials from the request-token leg. Consumed by the
/// access-token exchange and discarded afterwards.
#[derive(Debug, Clone)]
pub struct RequestToken {
    /// Temporary token.
    pub oauth_token: String,
    /// Secret paired with the temporary token.
    pub oauth_token_secret: String,
}

/// Long-lived credentials from the access-token exchange.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Access token.
    pub oauth_token: String,
    /// Secret paired with the access token.
    pub oauth_token_secret: String,
}

/// Upstream endpoints for the token flows.
#[derive(Debug, Clone)]
pub struct FlowEndpoints {
    /// Request-token URI (first leg).
    pub request_token_uri: String,
    /// Access-token URI (third leg).
    pub access_token_uri: String,
    /// Authorize URI for the user redirect, when the upstream has one.
    pub authorize_uri: Option<String>,
    /// Callback used when the caller supplies none.
    pub default_callback: String,
}

/// Client for the token flows.
#[derive(Clone)]
pub struct FlowClient {
    agent: Agent,
    credentials: Credentials,
    endpoints: FlowEndpoints,
}

impl FlowClient {
    /// Create a flow client.
    #[must_use]
    pub fn new(credentials: Credentials, endpoints: FlowEndpoints) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            credentials,
            endpoints,
        }
    }

    /// First leg: obtain a request token.
    ///
    /// `callback` overrides the configured default callback URI.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx upstream responses (body verbatim).
    pub fn request_token(&self, callback: Option<&str>) -> Result<RequestToken, OAuthError> {
        let callback = callback.unwrap_or(&self.endpoints.default_callback);
        let auth_header = create_authorization_header(
            &self.credentials,
            &SignContext {
                method: "POST",
                base_url: &self.endpoints.request_token_uri,
                callback: Some(callback),
                ..SignContext::default()
            },
        )?;

        let body = self.post_for_tokens(&self.endpoints.request_token_uri, &auth_header)?;
        let params = parse_token_response(&body);

        Ok(RequestToken {
            oauth_token: required_param(&params, "oauth_token")?,
            oauth_token_secret: required_param(&params, "oauth_token_secret")?,
        })
    }

    /// Second leg helper: user authorization URL, when configured.
    #[must_use]
    pub fn authorization_url(&self, request_token: &RequestToken) -> Option<String> {
        self.endpoints
            .authorize_uri
            .as_ref()
            .map(|uri| format!("{uri}?oauth_token={}", request_token.oauth_token))
    }

    /// Third leg: exchange a request token plus verifier for an access token.
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx upstream responses (body verbatim).
    pub fn exchange_verifier(
        &self,
        request_token: &str,
        request_token_secret: &str,
        verifier: &str,
    ) -> Result<AccessToken, OAuthError> {
        let auth_header = create_authorization_header(
            &self.credentials,
            &SignContext {
                method: "POST",
                base_url: &self.endpoints.access_token_uri,
                token: Some(request_token),
                token_secret: Some(request_token_secret),
                verifier: Some(verifier),
                ..SignContext::default()
            },
        )?;

        let body = self.post_for_tokens(&self.endpoints.access_token_uri, &auth_header)?;
        let params = parse_token_response(&body);

        Ok(AccessToken {
            oauth_token: required_param(&params, "oauth_token")?,
            oauth_token_secret: required_param(&params, "oauth_token_secret")?,
        })
    }

    /// POST a signed, bodyless token request and return the 2xx body.
    fn post_for_tokens(&self, url: &str, auth_header: &str) -> Result<String, OAuthError> {
        let response = self
            .agent
            .post(url)
            .header("Authorization", auth_header)
            .send(&[] as &[u8])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();
        let body = body_reader
            .read_to_string()
            .map_err(|e| OAuthError::Protocol(format!("failed to read token response: {e}")))?;

        if !(200..300).contains(&status) {
            tracing::debug!(status, "token flow rejected by upstream");
            return Err(OAuthError::Upstream { status, body });
        }

        Ok(body)
    }
}

/// Parse a URL-encoded token response body.
fn parse_token_response(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            params.insert(
                percent_decode_str(key).decode_utf8_lossy().into_owned(),
                percent_decode_str(value).decode_utf8_lossy().into_owned(),
            );
        }
    }
    params
}

/// Extract a required parameter from a token response.
fn required_param(params: &HashMap<String, String>, key: &str) -> Result<String, OAuthError> {
    params
        .get(key)
        .cloned()
        .ok_or_else(|| OAuthError::Protocol(format!("missing parameter: {key}")))
}
