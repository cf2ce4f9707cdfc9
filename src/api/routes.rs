//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Feedback documents
        .route("/feedbacks", get(handlers::list_feedbacks))
        .route("/feedbacks/:id", get(handlers::get_feedback))
        // Aggregate analysis
        .route("/analysis", get(handlers::feedback_analysis))
        .route("/services/:service/analysis", get(handlers::service_analysis))
        // Cache administration
        .route(
            "/admin/precompute-sentiment",
            post(handlers::precompute_sentiment),
        )
        .route("/admin/cache", get(handlers::cache_stats))
        .with_state(state)
}
