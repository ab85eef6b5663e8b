mod common;

use axum::http::{Method, StatusCode};
use common::{PASSWORD, TestApp, USER_COOKIE};
use kxl_models::PrincipalStatus;
use serde_json::json;

#[tokio::test]
async fn test_register_returns_profile() {
    let app = TestApp::new();
    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({"username": "alice", "email": "alice@example.com", "password": "pw"})),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.code(), 200);
    assert_eq!(res.body["message"], "success");
    assert_eq!(res.body["data"]["username"], "alice");
    assert!(res.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new();
    app.seed_user("alice");

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({"username": "alice", "email": "other@example.com", "password": "pw"})),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.code(), 40002);
}

#[tokio::test]
async fn test_register_invalid_body_is_validation_error() {
    let app = TestApp::new();
    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({"username": "bob"})),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), 40001);
    assert!(res.body["data"].is_null());
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = TestApp::new();
    let user = app.seed_user("carol");

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "carol@example.com", "password": PASSWORD})),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["id"], user.id.to_string());

    let header = res.set_cookie_header(USER_COOKIE).unwrap();
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Lax"));
    assert!(header.contains("Path=/"));
    assert!(header.contains("Max-Age=604800"));

    let token = res.cookie(USER_COOKIE).unwrap();
    assert_eq!(token.len(), 64);
    assert!(app.store.contains(&format!("kxl_session:user:{token}")));
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.seed_user("dave");

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "dave", "password": "wrong"})),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), 40101);
    assert!(res.cookie(USER_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_unknown_user_is_unauthorized() {
    let app = TestApp::new();
    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "nobody", "password": PASSWORD})),
            None,
        )
        .await;
    assert_eq!(res.code(), 40101);
}

#[tokio::test]
async fn test_login_disabled_user_is_forbidden() {
    let app = TestApp::new();
    let user = app.seed_user("erin");
    app.principals.set_user_status(user.id, PrincipalStatus::Disabled);

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "erin", "password": PASSWORD})),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 40301);
}

#[tokio::test]
async fn test_me_requires_cookie() {
    let app = TestApp::new();
    let res = app.call(Method::GET, "/api/v1/auth/me", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), 40101);

    let res = app
        .call(Method::GET, "/api/v1/auth/me", None, Some((USER_COOKIE, "")))
        .await;
    assert_eq!(res.code(), 40101);
}

#[tokio::test]
async fn test_me_with_session() {
    let app = TestApp::new();
    app.seed_user("frank");
    let token = app.login_user("frank").await;

    let res = app
        .call(Method::GET, "/api/v1/auth/me", None, Some((USER_COOKIE, &token)))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["username"], "frank");
}

#[tokio::test]
async fn test_logout_deletes_session() {
    let app = TestApp::new();
    app.seed_user("grace");
    let token = app.login_user("grace").await;

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/logout",
            None,
            Some((USER_COOKIE, &token)),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["data"].is_null());
    assert!(res.set_cookie_header(USER_COOKIE).unwrap().contains("Max-Age=0"));
    assert!(!app.store.contains(&format!("kxl_session:user:{token}")));

    let res = app
        .call(Method::GET, "/api/v1/auth/me", None, Some((USER_COOKIE, &token)))
        .await;
    assert_eq!(res.code(), 40101);
}

#[tokio::test]
async fn test_concurrent_sessions_are_independent() {
    let app = TestApp::new();
    app.seed_user("heidi");
    let first = app.login_user("heidi").await;
    let second = app.login_user("heidi").await;
    assert_ne!(first, second);

    app.call(
        Method::POST,
        "/api/v1/auth/logout",
        None,
        Some((USER_COOKIE, &first)),
    )
    .await;

    let res = app
        .call(Method::GET, "/api/v1/auth/me", None, Some((USER_COOKIE, &second)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_invalidates_every_session() {
    let app = TestApp::new();
    let user = app.seed_user("ivan");
    let current = app.login_user("ivan").await;
    let other = app.login_user("ivan").await;

    let res = app
        .call(
            Method::POST,
            "/api/v1/users/change-password",
            Some(json!({"old_password": PASSWORD, "new_password": "new-secret"})),
            Some((USER_COOKIE, &current)),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.principals.user(user.id).unwrap().session_version, 2);
    assert!(!app.store.contains(&format!("kxl_session:user:{current}")));

    let other_key = format!("kxl_session:user:{other}");
    assert!(app.store.contains(&other_key));
    let res = app
        .call(Method::GET, "/api/v1/auth/me", None, Some((USER_COOKIE, &other)))
        .await;
    assert_eq!(res.code(), 40101);
    assert!(!app.store.contains(&other_key));

    let res = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"identifier": "ivan", "password": "new-secret"})),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_wrong_old_password() {
    let app = TestApp::new();
    let user = app.seed_user("judy");
    let token = app.login_user("judy").await;

    let res = app
        .call(
            Method::POST,
            "/api/v1/users/change-password",
            Some(json!({"old_password": "nope", "new_password": "x"})),
            Some((USER_COOKIE, &token)),
        )
        .await;

    assert_eq!(res.code(), 40101);
    assert_eq!(app.principals.user(user.id).unwrap().session_version, 1);
}

#[tokio::test]
async fn test_session_version_bump_rejects_and_deletes() {
    let app = TestApp::new();
    let user = app.seed_user("mallory");
    let token = app.login_user("mallory").await;
    app.principals.set_user_session_version(user.id, 2);

    let res = app
        .call(Method::GET, "/api/v1/auth/me", None, Some((USER_COOKIE, &token)))
        .await;

    assert_eq!(res.code(), 40101);
    assert!(!app.store.contains(&format!("kxl_session:user:{token}")));
}

#[tokio::test]
async fn test_session_store_outage_is_internal() {
    let app = TestApp::new();
    app.seed_user("oscar");
    let token = app.login_user("oscar").await;
    app.store.set_unavailable(true);

    let res = app
        .call(Method::GET, "/api/v1/auth/me", None, Some((USER_COOKIE, &token)))
        .await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.code(), 50099);
}
