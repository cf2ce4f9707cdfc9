use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use feedback_analytics::api::build_app;
use feedback_analytics::api::build_state;
use feedback_analytics::api::timing::PROCESS_TIME_HEADER;
use feedback_analytics::models::CreateFeedbackRequest;
use feedback_analytics::models::FeedbackDocument;
use feedback_analytics::store::InMemoryStore;
use feedback_analytics::AppConfig;
use serde_json::Value;
use tower::ServiceExt;

fn feedback(service: &str, feedback_type: &str, rating: i32, message: &str) -> CreateFeedbackRequest {
    CreateFeedbackRequest {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        feedback_type: feedback_type.to_string(),
        service: service.to_string(),
        message: Some(message.to_string()),
        rating,
        attach_screenshot: false,
        agree_to_terms: true,
    }
}

async fn setup_app() -> (Router, Arc<InMemoryStore>, FeedbackDocument) {
    let store = Arc::new(InMemoryStore::new());
    let first = store
        .create(feedback("billing", "bug", 4, "Refund refund delayed, terrible support"))
        .await;
    store
        .create(feedback("billing", "bug", 2, "This is terrible and awful"))
        .await;
    store
        .create(feedback("shipping", "feature", 5, "This is absolutely wonderful and great"))
        .await;

    let config = AppConfig::default();
    let state = build_state(&config, store.clone());
    (build_app(state, &config.server), store, first)
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    assert!(response.headers().contains_key(PROCESS_TIME_HEADER));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (app, store, _) = setup_app().await;

    let (status, body) = send(app.clone(), "GET", "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");

    store.set_offline(true);
    let (status, body) = send(app, "GET", "/api/health").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_list_feedbacks() {
    let (app, _, _) = setup_app().await;

    let (status, body) = send(app.clone(), "GET", "/api/feedbacks?limit=2&skip=0").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item["sentimentScore"].is_number());
        assert!(item["feedbackType"].is_string());
        assert!(item["topKeywords"].as_array().unwrap().len() <= 5);
    }

    let (_, body) = send(app, "GET", "/api/feedbacks").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_feedback_by_id() {
    let (app, _, first) = setup_app().await;

    let uri = format!("/api/feedbacks/{}", first.id);
    let (status, body) = send(app.clone(), "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], first.id.to_string());
    assert_eq!(body["data"]["sentiment"], "negative");
    assert_eq!(body["data"]["topKeywords"][0]["word"], "refund");
    assert_eq!(body["data"]["topKeywords"][0]["frequency"], 2);

    let (status, body) = send(app.clone(), "GET", "/api/feedbacks/not-a-uuid").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let missing = format!("/api/feedbacks/{}", uuid::Uuid::new_v4());
    let (_, body) = send(app, "GET", &missing).await;
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_feedback_analysis() {
    let (app, _, _) = setup_app().await;

    let (status, body) = send(app, "GET", "/api/analysis").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalFeedback"], 3);
    assert_eq!(data["averageRating"], 3.67);

    let types = data["feedbackTypeCounts"].as_array().unwrap();
    assert!(types.contains(&serde_json::json!({"key": "bug", "value": 2})));
    assert!(types.contains(&serde_json::json!({"key": "feature", "value": 1})));

    let sentiment = data["sentimentCounts"].as_array().unwrap();
    assert_eq!(sentiment.len(), 3);
    assert_eq!(sentiment[0]["key"], "positive");
    assert_eq!(sentiment[0]["value"], 1);
}

#[tokio::test]
async fn test_service_analysis() {
    let (app, _, _) = setup_app().await;

    let (status, body) = send(app.clone(), "GET", "/api/services/billing/analysis").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["service"], "billing");
    assert_eq!(data["totalFeedback"], 2);
    assert_eq!(data["averageRating"], 3.0);
    assert_eq!(data["sentimentBreakdown"]["negative"], 2);
    assert!(data["topKeywords"].as_array().unwrap().len() <= 5);

    let (_, body) = send(app, "GET", "/api/services/unknown/analysis").await;
    assert_eq!(body["data"]["totalFeedback"], 0);
    assert_eq!(body["data"]["averageRating"], 0.0);
}

#[tokio::test]
async fn test_precompute_and_cache_stats() {
    let (app, _, _) = setup_app().await;

    let (status, body) = send(app.clone(), "POST", "/api/admin/precompute-sentiment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "success");
    assert_eq!(body["data"]["processed_docs"], 3);
    assert!(body["data"]["timeTaken"]
        .as_str()
        .unwrap()
        .ends_with("seconds"));

    let (status, body) = send(app, "GET", "/api/admin/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], true);
    assert_eq!(body["data"]["tables"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["totalEntries"], 9);
}

#[tokio::test]
async fn test_store_failure_is_a_server_error() {
    let (app, store, _) = setup_app().await;
    store.set_offline(true);

    let (status, _) = send(app.clone(), "GET", "/api/analysis").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(app.clone(), "GET", "/api/feedbacks").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = send(app, "POST", "/api/admin/precompute-sentiment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "error");
}
