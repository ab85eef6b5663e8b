#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use kxl::router::init_router;
use kxl::state::AppState;
use kxl_cache::MemoryStore;
use kxl_config::Config;
use kxl_core::password::hash_password_with_cost;
use kxl_db::{MemoryPrincipalRepository, MemoryRolePermissionRepository};
use kxl_models::{Admin, AdminId, PrincipalStatus, User, UserId};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse";
pub const USER_COOKIE: &str = "kxl_user_session";
pub const ADMIN_COOKIE: &str = "kxl_admin_session";

/// Router wired to in-memory backends, with handles to poke at them.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub principals: MemoryPrincipalRepository,
    pub roles: MemoryRolePermissionRepository,
    pub store: MemoryStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn code(&self) -> i64 {
        self.body["code"].as_i64().unwrap_or_default()
    }

    /// Value of a `Set-Cookie` named `name`, if the response set one.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|raw| {
                let pair = raw.split(';').next()?;
                let (key, value) = pair.split_once('=')?;
                (key.trim() == name).then(|| value.trim().to_string())
            })
    }

    pub fn set_cookie_header(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|raw| raw.starts_with(&format!("{name}=")))
            .map(str::to_string)
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.security.password_hash_cost = 4;
    config
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let principals = MemoryPrincipalRepository::new();
        let roles = MemoryRolePermissionRepository::seeded();
        let store = MemoryStore::new();
        let state = AppState::new(
            config,
            Arc::new(principals.clone()),
            Arc::new(roles.clone()),
            Arc::new(store.clone()),
        );
        Self {
            router: init_router(state.clone()),
            state,
            principals,
            roles,
            store,
        }
    }

    pub fn seed_user(&self, username: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password_with_cost(PASSWORD, 4).unwrap(),
            status: PrincipalStatus::Active,
            session_version: 1,
            created_at: now,
            updated_at: now,
        };
        self.principals.insert_user(user.clone());
        user
    }

    pub fn seed_admin(&self, username: &str, role: &str) -> Admin {
        let now = Utc::now();
        let admin = Admin {
            id: AdminId::new(),
            username: username.to_string(),
            password_hash: hash_password_with_cost(PASSWORD, 4).unwrap(),
            role: role.to_string(),
            status: PrincipalStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.principals.insert_admin(admin.clone());
        admin
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<(&str, &str)>,
    ) -> TestResponse {
        self.send(build_request(method, uri, body, cookie, "203.0.113.10"))
            .await
    }

    /// Logs in through the API and returns the user session token.
    pub async fn login_user(&self, identifier: &str) -> String {
        let res = self
            .call(
                Method::POST,
                "/api/v1/auth/login",
                Some(serde_json::json!({"identifier": identifier, "password": PASSWORD})),
                None,
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        res.cookie(USER_COOKIE).expect("user cookie")
    }

    /// Logs in through the API and returns the admin session token.
    pub async fn login_admin(&self, username: &str) -> String {
        let res = self
            .call(
                Method::POST,
                "/api/admin/auth/login",
                Some(serde_json::json!({"identifier": username, "password": PASSWORD})),
                None,
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "admin login failed: {}", res.body);
        res.cookie(ADMIN_COOKIE).expect("admin cookie")
    }
}

pub fn build_request(
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<(&str, &str)>,
    client_ip: &str,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", client_ip);
    if let Some((name, value)) = cookie {
        builder = builder.header(header::COOKIE, format!("{name}={value}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", &Uuid::new_v4().simple().to_string()[..8])
}
