//! Business error taxonomy.
//!
//! Every failure that reaches an HTTP boundary is an [`AppError`]: a numeric
//! business code, the HTTP status implied by that code, a human readable
//! message and optional structured data. It renders as
//! `{"code": .., "message": .., "data": ..}`.
//!
//! Any `E: Into<anyhow::Error>` converts into an internal error, so `?` works
//! on driver and I/O errors inside handlers. The underlying cause is never
//! written to the response body; it is logged and attached to the response
//! as an [`ErrorDetail`] extension for the router to surface outside of
//! production.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// Standard business error codes.
pub mod codes {
    pub const VALIDATION: i32 = 40001;
    pub const CONFLICT: i32 = 40002;
    pub const UNAUTHORIZED: i32 = 40101;
    pub const FORBIDDEN: i32 = 40301;
    pub const NOT_FOUND: i32 = 40401;
    pub const REQUEST_TIMEOUT: i32 = 40801;
    pub const TOO_MANY_REQUESTS: i32 = 42901;
    pub const INTERNAL: i32 = 50099;
}

/// Maps a business code to the HTTP status it is rendered with.
#[must_use]
pub fn status_for_code(code: i32) -> StatusCode {
    match code {
        codes::VALIDATION => StatusCode::BAD_REQUEST,
        codes::CONFLICT => StatusCode::CONFLICT,
        codes::UNAUTHORIZED => StatusCode::UNAUTHORIZED,
        codes::FORBIDDEN => StatusCode::FORBIDDEN,
        codes::NOT_FOUND => StatusCode::NOT_FOUND,
        codes::REQUEST_TIMEOUT => StatusCode::REQUEST_TIMEOUT,
        codes::TOO_MANY_REQUESTS => StatusCode::TOO_MANY_REQUESTS,
        c if c >= 50000 => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

#[derive(Debug)]
pub struct AppError {
    pub code: i32,
    pub status: StatusCode,
    pub message: String,
    pub data: Option<Value>,
    pub source: Option<Error>,
}

/// Wire shape shared by error and success envelopes.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Diagnostic text of an internal failure, carried as a response extension.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub body: ErrorBody,
    pub detail: String,
}

impl AppError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            status: status_for_code(code),
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(codes::VALIDATION, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(codes::CONFLICT, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(codes::UNAUTHORIZED, "unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(codes::FORBIDDEN, "forbidden")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::new(codes::NOT_FOUND, "not found");
        }
        Self::new(codes::NOT_FOUND, message)
    }

    pub fn too_many_requests() -> Self {
        Self::new(codes::TOO_MANY_REQUESTS, "too many requests: rate limit exceeded")
    }

    pub fn request_timeout() -> Self {
        Self::new(codes::REQUEST_TIMEOUT, "request timeout")
    }

    /// Internal failure with a caller-chosen, client-safe message.
    pub fn internal_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::new(codes::INTERNAL, "internal error");
        }
        Self::new(codes::INTERNAL, message)
    }

    /// Internal failure caused by `err`. The response only says
    /// `"internal error"`; the cause is logged.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            source: Some(err.into()),
            ..Self::new(codes::INTERNAL, "internal error")
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn is(&self, code: i32) -> bool {
        self.code == code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} ({}): {:#}", self.message, self.code, source),
            None => write!(f, "{} ({})", self.message, self.code),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: self.message,
            data: self.data,
        };

        let Some(source) = self.source else {
            return (self.status, Json(body)).into_response();
        };

        let detail = format!("{source:#}");
        error!(error.code = body.code, error.detail = %detail, "Internal error");

        let mut response = (self.status, Json(body.clone())).into_response();
        response.extensions_mut().insert(ErrorDetail { body, detail });
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_for_standard_codes() {
        assert_eq!(status_for_code(codes::VALIDATION), StatusCode::BAD_REQUEST);
        assert_eq!(status_for_code(codes::CONFLICT), StatusCode::CONFLICT);
        assert_eq!(status_for_code(codes::UNAUTHORIZED), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for_code(codes::FORBIDDEN), StatusCode::FORBIDDEN);
        assert_eq!(status_for_code(codes::NOT_FOUND), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for_code(codes::REQUEST_TIMEOUT),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            status_for_code(codes::TOO_MANY_REQUESTS),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_for_code(codes::INTERNAL),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_status_for_other_codes() {
        assert_eq!(status_for_code(50001), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for_code(40099), StatusCode::BAD_REQUEST);
        assert_eq!(status_for_code(0), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(AppError::unauthorized().message, "unauthorized");
        assert_eq!(AppError::forbidden().message, "forbidden");
        assert_eq!(AppError::not_found("").message, "not found");
        assert_eq!(AppError::internal_message("").message, "internal error");
        assert_eq!(AppError::request_timeout().message, "request timeout");
        assert_eq!(
            AppError::too_many_requests().status,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: AppError = anyhow::anyhow!("connection reset").into();
        assert!(err.is(codes::INTERNAL));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "internal error");
    }

    #[tokio::test]
    async fn test_business_error_envelope() {
        let response = AppError::conflict("conflict: username already exists").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response.extensions().get::<ErrorDetail>().is_none());

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({"code": 40002, "message": "conflict: username already exists", "data": null})
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let response = AppError::internal(anyhow::anyhow!("password authentication failed"))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = response.extensions().get::<ErrorDetail>().cloned().unwrap();
        assert!(detail.detail.contains("password authentication failed"));

        let body = body_json(response).await;
        assert_eq!(body["code"], 50099);
        assert_eq!(body["message"], "internal error");
    }

    #[tokio::test]
    async fn test_error_with_data() {
        let response = AppError::validation("validation error")
            .with_data(json!({"field": "username"}))
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"]["field"], "username");
    }
}
