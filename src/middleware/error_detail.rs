//! Surfaces internal error causes outside production.
//!
//! [`AppError`](kxl_core::AppError) keeps the cause of an internal failure
//! out of the body and attaches it as an [`ErrorDetail`] extension. Outside
//! production this layer rewrites the body so the cause replaces the generic
//! message.

use axum::{Json, extract::Request, middleware::Next, response::IntoResponse, response::Response};
use kxl_core::ErrorDetail;
use kxl_core::errors::ErrorBody;

pub async fn expose_error_detail(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let status = response.status();
    let body = ErrorBody {
        message: detail.detail,
        ..detail.body
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use http_body_util::BodyExt;
    use kxl_core::AppError;
    use tower::ServiceExt;

    async fn failing() -> Result<(), AppError> {
        Err(AppError::internal(anyhow::anyhow!("connection refused")))
    }

    async fn rejected() -> Result<(), AppError> {
        Err(AppError::forbidden())
    }

    fn app() -> Router {
        Router::new()
            .route("/fail", get(failing))
            .route("/forbidden", get(rejected))
            .layer(middleware::from_fn(expose_error_detail))
    }

    async fn call(path: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_internal_detail_is_exposed() {
        let (status, body) = call("/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 50099);
        assert_eq!(body["message"], "connection refused");
    }

    #[tokio::test]
    async fn test_business_errors_untouched() {
        let (status, body) = call("/forbidden").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "forbidden");
    }
}
