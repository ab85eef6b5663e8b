use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kxl_core::AppError;
use tracing::warn;

/// Bounds each request by `limit`. Dropping the inner future cancels any
/// backend call still in flight; the caller gets a `40801` envelope.
pub async fn request_timeout(
    State(limit): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "Request timed out");
            AppError::request_timeout().into_response()
        }
    }
}
