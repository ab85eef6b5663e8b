//! Success envelopes.
//!
//! Every successful handler returns `200` with
//! `{"code": 200, "message": "success", "data": ..}`. Lists that page wrap
//! their rows in [`Paged`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: &'static str,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: "success",
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload; `data` renders as `null`.
    pub fn empty() -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: "success",
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }

    /// Converts the rows while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// `ceil(total / page_size)`, or `0` for an empty result.
#[must_use]
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    #[test]
    fn test_total_pages_empty() {
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn test_total_pages_single_item() {
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
    }

    #[test]
    fn test_total_pages_invalid_page_size() {
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_paged_map_keeps_meta() {
        let paged = Paged::new(vec![1, 2], 12, 2, 2).map(|n| n * 10);
        assert_eq!(paged.items, vec![10, 20]);
        assert_eq!(paged.total_pages, 6);
        assert_eq!(paged.page, 2);
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = ApiResponse::success(Paged::new(vec!["a"], 1, 1, 10)).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "code": 200,
                "message": "success",
                "data": {"items": ["a"], "total": 1, "page": 1, "page_size": 10, "total_pages": 1}
            })
        );
    }

    #[tokio::test]
    async fn test_empty_envelope_has_null_data() {
        let bytes = ApiResponse::empty()
            .into_response()
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"], Value::Null);
    }
}
