/// API request handlers
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::error;

use crate::analysis::Aggregator;
use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::store::FeedbackStore;

pub mod admin;
pub mod analysis;
pub mod feedback;

pub use admin::*;
pub use analysis::*;
pub use feedback::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedbackStore>,
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(store: Arc<dyn FeedbackStore>, aggregator: Arc<Aggregator>) -> Self {
        Self { store, aggregator }
    }
}

/// Health check handler; 500 when the store is unreachable
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                status: "healthy".to_string(),
                timestamp: Utc::now(),
                database: "connected".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                error: None,
            })),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse {
                    success: false,
                    data: Some(HealthResponse {
                        status: "unhealthy".to_string(),
                        timestamp: Utc::now(),
                        database: "disconnected".to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                        error: Some(e.to_string()),
                    }),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
