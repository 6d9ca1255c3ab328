//! HTTP request handlers.

pub(crate) mod auth;
pub(crate) mod sign;

use relay_oauth::OAuthError;

/// Serialize an error for response bodies and failure notifications.
///
/// Upstream rejections keep their original status and body so callers see
/// exactly what the provider said; everything else is a plain message.
pub(crate) fn error_payload(error: &OAuthError) -> serde_json::Value {
    match error {
        OAuthError::Upstream { status, body } => serde_json::json!({
            "statusCode": status,
            "data": body,
        }),
        other => serde_json::json!({ "error": other.to_string() }),
    }
}
