//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{evaluate, health, metrics, summary, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Valuation and aggregation
        .route("/api/v1/evaluate", post(evaluate))
        .route("/api/v1/summary", post(summary))
        // Prometheus exposition
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
