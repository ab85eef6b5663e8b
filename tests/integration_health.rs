mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, test_config};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let res = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({"code": 200, "message": "success", "data": "ok"})
    );
}

#[tokio::test]
async fn test_ready_when_backends_answer() {
    let app = TestApp::new();
    let res = app.call(Method::GET, "/ready", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_not_ready_when_cache_is_down() {
    let app = TestApp::new();
    app.store.set_unavailable(true);

    let res = app.call(Method::GET, "/ready", None, None).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["message"], "not ready");
}

#[tokio::test]
async fn test_not_ready_when_database_is_down() {
    let app = TestApp::new();
    app.principals.set_unavailable(true);

    let res = app.call(Method::GET, "/ready", None, None).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = TestApp::new();
    let res = app.call(Method::GET, "/api/v1/nope", None, None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.code(), 40401);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let res = app.call(Method::GET, "/health", None, None).await;
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_internal_detail_outside_production() {
    let app = TestApp::new();
    app.principals.set_unavailable(true);

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "alice", "password": "pw"})),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.code(), 50099);
    assert_ne!(res.body["message"], "internal error");
}

#[tokio::test]
async fn test_internal_detail_hidden_in_production() {
    let mut config = test_config();
    config.app.env = "production".to_string();
    let app = TestApp::with_config(config);
    app.principals.set_unavailable(true);

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "alice", "password": "pw"})),
            None,
        )
        .await;
    assert_eq!(res.code(), 50099);
    assert_eq!(res.body["message"], "internal error");
}

#[tokio::test]
async fn test_cors_mirrors_origin_with_credentials() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/auth/login")
        .header("origin", "https://www.example.com")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.send(request).await;
    assert_eq!(
        res.headers["access-control-allow-origin"],
        "https://www.example.com"
    );
    assert_eq!(res.headers["access-control-allow-credentials"], "true");
}
