use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kxl_core::ApiResponse;
use kxl_core::errors::ErrorBody;
use tokio::time::timeout;
use tracing::warn;

use crate::state::AppState;

/// Deadline for each backend probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Business code of a failed readiness probe.
pub const NOT_READY: i32 = 50301;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Process is up")),
    tag = "Health"
)]
pub async fn health() -> ApiResponse<&'static str> {
    ApiResponse::success("ok")
}

/// Readiness probe: Postgres and Redis must both answer within two seconds
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Backends reachable"),
        (status = 503, description = "A backend is down or slow", body = crate::docs::ErrorResponse)
    ),
    tag = "Health"
)]
pub async fn ready(State(state): State<AppState>) -> Response {
    let database = matches!(
        timeout(PROBE_TIMEOUT, state.principals.ping()).await,
        Ok(Ok(()))
    );
    let cache = matches!(timeout(PROBE_TIMEOUT, state.store.ping()).await, Ok(Ok(())));

    if database && cache {
        return ApiResponse::success("ok").into_response();
    }

    warn!(database, cache, "Readiness check failed");
    let body = ErrorBody {
        code: NOT_READY,
        message: "not ready".to_string(),
        data: None,
    };
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}
