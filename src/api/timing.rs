//! Request timing middleware

use std::time::Duration;
use std::time::Instant;

use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Requests slower than this are logged as warnings
#[derive(Debug, Clone, Copy)]
pub struct SlowRequestThreshold(pub Duration);

impl SlowRequestThreshold {
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

/// Stamp every response with its processing time in seconds
pub async fn process_time(
    State(threshold): State<SlowRequestThreshold>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let mut response = next.run(request).await;
    let elapsed = started.elapsed();

    let formatted = format!("{:.4}", elapsed.as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&formatted) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    if elapsed > threshold.0 {
        warn!("Slow request: {} - {}s", path, formatted);
    }
    response
}
