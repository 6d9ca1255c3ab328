//! Signed proxy endpoints.
//!
//! One signed upstream call per request. The executor's resolved outcomes
//! (2xx body, non-2xx status text) both map to 200 responses; only a
//! transport failure produces the 502 error shape.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use relay_oauth::{FetchOutcome, GetOptions, TokenPair};
use serde::Deserialize;

use crate::handlers::error_payload;
use crate::responses::ProxyResponse;
use crate::state::AppState;

/// Query parameters for signed GET requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignedGetQuery {
    url: String,
    access_token: String,
    access_token_secret: String,
    /// `"true"` requests the full, unpaginated result set.
    all_data: Option<String>,
}

/// Query parameters for signed DELETE requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignedDeleteQuery {
    url: String,
    access_token: String,
    access_token_secret: String,
}

/// JSON body for signed POST requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignedPostRequest {
    url: String,
    access_token: String,
    access_token_secret: String,
    /// Arbitrary JSON payload forwarded as the upstream request body.
    data: serde_json::Value,
}

/// Handle GET /proxy.
pub(crate) async fn signed_get(
    State(state): State<AppState>,
    Query(query): Query<SignedGetQuery>,
) -> Response {
    let signed = state.signed.clone();
    let token = TokenPair {
        token: query.access_token,
        secret: query.access_token_secret,
    };
    let options = GetOptions {
        all_data: is_truthy(query.all_data.as_deref()),
    };
    let url = query.url;

    let result =
        tokio::task::spawn_blocking(move || signed.get(&url, &token, &options)).await;
    finish(&state, result).await
}

/// Handle POST /proxy.
pub(crate) async fn signed_post(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<SignedPostRequest>,
) -> Response {
    let signed = state.signed.clone();
    let token = TokenPair {
        token: request.access_token,
        secret: request.access_token_secret,
    };
    let url = request.url;
    let body = request.data.to_string();

    let result =
        tokio::task::spawn_blocking(move || signed.post(&url, &token, &body)).await;
    finish(&state, result).await
}

/// Handle DELETE /proxy.
pub(crate) async fn signed_delete(
    State(state): State<AppState>,
    Query(query): Query<SignedDeleteQuery>,
) -> Response {
    let signed = state.signed.clone();
    let token = TokenPair {
        token: query.access_token,
        secret: query.access_token_secret,
    };
    let url = query.url;

    let result = tokio::task::spawn_blocking(move || signed.delete(&url, &token)).await;
    finish(&state, result).await
}

/// Map an executor result onto the terminal response and notify.
async fn finish(
    state: &AppState,
    result: Result<Result<FetchOutcome, relay_oauth::OAuthError>, tokio::task::JoinError>,
) -> Response {
    let response = match result {
        Ok(Ok(outcome)) => {
            let response = outcome_response(outcome);
            state
                .notifier
                .publish_success(&response.notification_payload())
                .await;
            response
        }
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "signed request failed");
            let payload = error_payload(&error);
            state.notifier.publish_failure(&payload).await;
            ProxyResponse::bad_gateway(&payload)
        }
        Err(join_error) => {
            tracing::error!(error = %join_error, "signed request task panicked");
            let payload = serde_json::json!({"error": "internal error"});
            state.notifier.publish_failure(&payload).await;
            ProxyResponse::bad_gateway(&payload)
        }
    };

    response.into_response()
}

/// Build the caller-facing response for a resolved upstream outcome.
fn outcome_response(outcome: FetchOutcome) -> ProxyResponse {
    match outcome {
        FetchOutcome::Success { body, headers } => ProxyResponse {
            status: 200,
            location: headers
                .into_iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("location"))
                .map(|(_, value)| value),
            body,
        },
        FetchOutcome::HttpStatus { text, .. } => {
            ProxyResponse::ok(serde_json::Value::String(text).to_string())
        }
    }
}

/// The original callers pass boolean flags as query strings.
fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
