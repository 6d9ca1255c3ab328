//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/request-token", post(handlers::auth::request_token))
        .route("/auth/access-token", post(handlers::auth::access_token))
        .route(
            "/proxy",
            get(handlers::sign::signed_get)
                .post(handlers::sign::signed_post)
                .delete(handlers::sign::signed_delete),
        )
        .layer(ServiceBuilder::new().layer(middleware::cors_layer()))
        .with_state(state)
}
