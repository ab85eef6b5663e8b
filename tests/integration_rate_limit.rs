mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, build_request, test_config};
use serde_json::json;

fn app_with_login_limit(max_requests: u64) -> TestApp {
    let mut config = test_config();
    config.security.login_rate_limit.window_seconds = 60;
    config.security.login_rate_limit.max_requests = max_requests;
    config.security.upload_rate_limit.max_requests = 2;
    TestApp::with_config(config)
}

fn login(identifier: &str, ip: &str) -> axum::http::Request<axum::body::Body> {
    build_request(
        Method::POST,
        "/api/v1/auth/login",
        Some(json!({"identifier": identifier, "password": "wrong"})),
        None,
        ip,
    )
}

#[tokio::test]
async fn test_login_limited_after_max_attempts() {
    let app = app_with_login_limit(3);
    app.seed_user("alice");

    for _ in 0..3 {
        let res = app.send(login("alice", "198.51.100.1")).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    }

    let res = app.send(login("alice", "198.51.100.1")).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.code(), 42901);
}

#[tokio::test]
async fn test_login_counters_are_per_ip_and_identifier() {
    let app = app_with_login_limit(1);
    app.seed_user("alice");

    assert_eq!(app.send(login("alice", "198.51.100.1")).await.code(), 40101);
    assert_eq!(app.send(login("alice", "198.51.100.1")).await.code(), 42901);
    assert_eq!(app.send(login("bob", "198.51.100.1")).await.code(), 40101);
    assert_eq!(app.send(login("alice", "198.51.100.2")).await.code(), 40101);

    let keys = app.store.keys_with_prefix("rl:login:user:198.51.100.1:");
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().all(|k| !k.contains("alice") && !k.contains("bob")));
}

#[tokio::test]
async fn test_login_window_expiry_resets() {
    let app = app_with_login_limit(1);

    app.send(login("alice", "198.51.100.1")).await;
    assert_eq!(app.send(login("alice", "198.51.100.1")).await.code(), 42901);

    for key in app.store.keys_with_prefix("rl:login:") {
        app.store.expire(&key);
    }
    assert_eq!(app.send(login("alice", "198.51.100.1")).await.code(), 40101);
}

#[tokio::test]
async fn test_admin_login_has_its_own_counter() {
    let app = app_with_login_limit(1);

    app.send(login("root", "198.51.100.1")).await;
    let res = app
        .send(build_request(
            Method::POST,
            "/api/admin/auth/login",
            Some(json!({"identifier": "root", "password": "wrong"})),
            None,
            "198.51.100.1",
        ))
        .await;
    assert_eq!(res.code(), 40101);
    assert_eq!(app.store.keys_with_prefix("rl:login:admin:").len(), 1);
}

#[tokio::test]
async fn test_limiter_fails_open_when_store_is_down() {
    let app = app_with_login_limit(1);
    app.store.set_unavailable(true);

    for _ in 0..3 {
        let res = app.send(login("alice", "198.51.100.1")).await;
        assert_eq!(res.code(), 40101);
    }
}

#[tokio::test]
async fn test_login_body_reaches_handler_after_limiting() {
    let app = app_with_login_limit(5);
    let user = app.seed_user("carol");

    let res = app
        .send(build_request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "carol", "password": common::PASSWORD})),
            None,
            "198.51.100.7",
        ))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["id"], user.id.to_string());
}

#[tokio::test]
async fn test_upload_routes_are_limited() {
    let app = app_with_login_limit(5);
    let upload = || {
        build_request(
            Method::POST,
            "/api/upload/image",
            None,
            None,
            "198.51.100.9",
        )
    };

    // No upload handler is mounted, so allowed requests fall through to 404.
    assert_eq!(app.send(upload()).await.code(), 40401);
    assert_eq!(app.send(upload()).await.code(), 40401);
    assert_eq!(app.send(upload()).await.code(), 42901);
    assert!(app.store.contains("rl:upload:user:198.51.100.9:image"));
}
