//! Token-flow endpoints.
//!
//! Both legs answer 200 regardless of the upstream verdict: the body is
//! either the token pair or the upstream error payload, so browser callers
//! branch on content instead of status. Only the HTTP exchange itself runs
//! on the blocking pool.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::handlers::error_payload;
use crate::responses::ProxyResponse;
use crate::state::AppState;

/// Query parameters for the request-token leg.
#[derive(Debug, Deserialize)]
pub(crate) struct RequestTokenQuery {
    /// Caller-supplied callback URI, overriding the configured default.
    oauth_callback: Option<String>,
}

/// JSON body for the access-token exchange.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessTokenRequest {
    request_token: String,
    request_token_secret: String,
    verifier: String,
}

/// Handle POST /auth/request-token.
pub(crate) async fn request_token(
    State(state): State<AppState>,
    Query(query): Query<RequestTokenQuery>,
) -> Response {
    let flow = state.flow.clone();
    let result = tokio::task::spawn_blocking(move || {
        flow.request_token(query.oauth_callback.as_deref())
    })
    .await;

    let response = match result {
        Ok(Ok(token)) => {
            let response = ProxyResponse::ok_json(&serde_json::json!({
                "requestToken": token.oauth_token,
                "requestTokenSecret": token.oauth_token_secret,
            }));
            state
                .notifier
                .publish_success(&response.notification_payload())
                .await;
            response
        }
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "request-token leg failed");
            let payload = error_payload(&error);
            state.notifier.publish_failure(&payload).await;
            ProxyResponse::ok_json(&payload)
        }
        Err(join_error) => {
            tracing::error!(error = %join_error, "request-token task panicked");
            let payload = serde_json::json!({"error": "internal error"});
            state.notifier.publish_failure(&payload).await;
            ProxyResponse::bad_gateway(&payload)
        }
    };

    response.into_response()
}

/// Handle POST /auth/access-token.
pub(crate) async fn access_token(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<AccessTokenRequest>,
) -> Response {
    let flow = state.flow.clone();
    let result = tokio::task::spawn_blocking(move || {
        flow.exchange_verifier(
            &request.request_token,
            &request.request_token_secret,
            &request.verifier,
        )
    })
    .await;

    let response = match result {
        Ok(Ok(token)) => {
            let response = ProxyResponse::ok_json(&serde_json::json!({
                "accessToken": token.oauth_token,
                "accessTokenSecret": token.oauth_token_secret,
            }));
            state
                .notifier
                .publish_success(&response.notification_payload())
                .await;
            response
        }
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "access-token exchange failed");
            let payload = error_payload(&error);
            state.notifier.publish_failure(&payload).await;
            ProxyResponse::ok_json(&payload)
        }
        Err(join_error) => {
            tracing::error!(error = %join_error, "access-token task panicked");
            let payload = serde_json::json!({"error": "internal error"});
            state.notifier.publish_failure(&payload).await;
            ProxyResponse::bad_gateway(&payload)
        }
    };

    response.into_response()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_request_token_query_callback_optional() {
        let query: RequestTokenQuery = serde_urlencoded::from_str("").unwrap();
        assert!(query.oauth_callback.is_none());

        let query: RequestTokenQuery =
            serde_urlencoded::from_str("oauth_callback=https%3A%2F%2Fapp%2Fcb").unwrap();
        assert_eq!(query.oauth_callback.as_deref(), Some("https://app/cb"));
    }

    #[test]
    fn test_access_token_request_uses_camel_case() {
        let request: AccessTokenRequest = serde_json::from_str(
            r#"{"requestToken": "rt", "requestTokenSecret": "rts", "verifier": "v"}"#,
        )
        .unwrap();
        assert_eq!(request.request_token, "rt");
        assert_eq!(request.request_token_secret, "rts");
        assert_eq!(request.verifier, "v");
    }

    #[test]
    fn test_access_token_request_rejects_missing_fields() {
        let result: Result<AccessTokenRequest, _> =
            serde_json::from_str(r#"{"requestToken": "rt"}"#);
        assert!(result.is_err());
    }
}
