use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use odo_registry::Registry;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Build the axum router with all registry endpoints.
pub fn build_router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/invoke", post(handler::invoke_handler))
        .route("/v1/readings", get(handler::read_all_handler))
        .route("/v1/readings/:id", get(handler::read_one_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(registry)
}
