/// Cache administration handlers
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::CacheStatsResponse;
use crate::api::types::PrecomputeResponse;
use crate::models::WarmUpReport;

/// Warm every memo table from the store
pub async fn precompute_sentiment(
    State(state): State<AppState>,
) -> Json<ApiResponse<PrecomputeResponse>> {
    info!("POST /api/admin/precompute-sentiment");

    let started = Instant::now();
    let report = state.aggregator.warm_up_store(state.store.as_ref()).await;
    let time_taken = format!("{:.2} seconds", started.elapsed().as_secs_f64());

    let error = match &report {
        WarmUpReport::Error { error } => Some(error.clone()),
        WarmUpReport::Success { .. } => None,
    };
    Json(ApiResponse {
        success: error.is_none(),
        data: Some(PrecomputeResponse { report, time_taken }),
        error,
    })
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<ApiResponse<CacheStatsResponse>> {
    info!("GET /api/admin/cache");
    Json(ApiResponse::success(CacheStatsResponse::from(
        state.aggregator.analyzer().cache().info(),
    )))
}
