//! Response header middleware.
//!
//! The proxy is called from browser single-page apps on other origins, so
//! every response carries a permissive CORS header.

use axum::http::HeaderValue;
use axum::http::header;
use tower_http::set_header::SetResponseHeaderLayer;

/// Create layer that adds `Access-Control-Allow-Origin: *` to all responses.
pub(crate) fn cors_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    )
}
