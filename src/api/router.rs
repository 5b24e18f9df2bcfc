//! Route assembly.
//!
//! Returns a composable `Router` so tests can drive the full request path
//! without binding a socket.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the application router.
pub fn app_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health))
        .route("/validate-bill", post(endpoints::validate_bill))
        .route("/explain-bill", post(endpoints::explain_bill))
        .route("/draft-appeal", post(endpoints::draft_appeal))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
