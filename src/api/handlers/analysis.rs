/// Aggregate analysis handlers
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::FeedbackAnalysisResponse;
use crate::api::types::ServiceAnalysisResponse;

/// Collection-wide stats plus sentiment counts
pub async fn feedback_analysis(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FeedbackAnalysisResponse>>, StatusCode> {
    info!("GET /api/analysis");

    let store = state.store.as_ref();
    let stats = state.aggregator.analyze_feedback(store).await;
    let sentiment = state.aggregator.sentiment_counts(store).await;

    match (stats, sentiment) {
        (Ok(stats), Ok(sentiment)) => Ok(Json(ApiResponse::success(
            FeedbackAnalysisResponse::new(stats, sentiment),
        ))),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to analyze feedback: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn service_analysis(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<Json<ApiResponse<ServiceAnalysisResponse>>, StatusCode> {
    info!("GET /api/services/{}/analysis", service);

    match state
        .aggregator
        .analyze_service(state.store.as_ref(), &service)
        .await
    {
        Ok(stats) => Ok(Json(ApiResponse::success(ServiceAnalysisResponse::new(
            service, stats,
        )))),
        Err(e) => {
            error!("Failed to analyze service {}: {}", service, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
