/// Feedback document handlers
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::FeedbackResponse;
use crate::api::types::PaginationQuery;

/// Largest page a single request may ask for
const MAX_PAGE_SIZE: i64 = 500;

/// List feedback, newest first, with per-document analysis
pub async fn list_feedbacks(
    State(state): State<AppState>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FeedbackResponse>>>, StatusCode> {
    info!(
        "GET /api/feedbacks?limit={}&skip={}",
        params.limit, params.skip
    );

    if params.limit < 0 || params.skip < 0 {
        return Ok(Json(ApiResponse::error(
            "limit and skip must not be negative",
        )));
    }
    let limit = params.limit.min(MAX_PAGE_SIZE);

    match state.store.list(limit, params.skip).await {
        Ok(documents) => {
            let feedbacks = documents
                .into_iter()
                .map(|doc| FeedbackResponse::from(state.aggregator.describe(doc)))
                .collect();
            Ok(Json(ApiResponse::success(feedbacks)))
        }
        Err(e) => {
            error!("Failed to list feedbacks: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// One feedback document by id; `null` when missing or the id is malformed
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Option<FeedbackResponse>>>, StatusCode> {
    info!("GET /api/feedbacks/{}", id);

    let Ok(uuid) = Uuid::parse_str(&id) else {
        warn!("Malformed feedback id: {}", id);
        return Ok(Json(ApiResponse::success(None)));
    };

    match state.store.find_by_id(uuid).await {
        Ok(document) => Ok(Json(ApiResponse::success(
            document.map(|doc| FeedbackResponse::from(state.aggregator.describe(doc))),
        ))),
        Err(e) => {
            error!("Error in get_feedback for {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
