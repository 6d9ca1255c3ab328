//! Proxy response shape.
//!
//! Every handler resolves to a [`ProxyResponse`]: a status code, an optional
//! `Location` header propagated from the upstream, and a JSON body. Callers
//! branch on the body, so upstream failures that produced a response still
//! come back as 200 with the resolved payload; only transport failures use
//! the 502 error shape.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Terminal response for one proxied invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProxyResponse {
    /// HTTP status returned to the caller.
    pub(crate) status: u16,
    /// Upstream `Location` header, when one should be propagated.
    pub(crate) location: Option<String>,
    /// JSON text returned verbatim as the body.
    pub(crate) body: String,
}

impl ProxyResponse {
    /// A 200 response with a pre-serialized JSON body.
    pub(crate) fn ok(body: String) -> Self {
        Self {
            status: 200,
            location: None,
            body,
        }
    }

    /// A 200 response with a serializable payload.
    pub(crate) fn ok_json(payload: &serde_json::Value) -> Self {
        Self::ok(payload.to_string())
    }

    /// The 502 transport-failure response.
    pub(crate) fn bad_gateway(payload: &serde_json::Value) -> Self {
        Self {
            status: 502,
            location: None,
            body: payload.to_string(),
        }
    }

    /// Snapshot of this response for notification payloads.
    pub(crate) fn notification_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "statusCode": self.status,
            "body": self.body,
        })
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut response = (status, self.body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if let Some(location) = self.location
            && let Ok(value) = HeaderValue::from_str(&location)
        {
            response.headers_mut().insert(header::LOCATION, value);
        }
        response
    }
}
