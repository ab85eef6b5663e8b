//! Pre-handler rate limiting for login and upload routes.
//!
//! Runs in front of routing and authentication. Requests that match none of
//! the limited routes pass straight through. A denied request never reaches
//! its handler and gets `42901`.

use std::collections::HashMap;

use axum::{
    Form, Json,
    body::{Body, Bytes, to_bytes},
    extract::{FromRequest, Request, State},
    http::{Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kxl_auth::{ActorKind, CurrentAdmin, CurrentUser, RateLimitDecision};
use kxl_core::AppError;
use serde_json::Value;
use tracing::warn;

use crate::state::AppState;
use crate::utils::client_ip::ClientIp;

/// Largest login body buffered to read the identifier.
const MAX_LOGIN_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitedRoute {
    Login(ActorKind),
    Upload(ActorKind, &'static str),
}

/// Classifies a request path. Only `POST` is limited.
pub fn classify(method: &Method, path: &str) -> Option<LimitedRoute> {
    if method != Method::POST {
        return None;
    }
    let path = path.trim_end_matches('/');
    match path {
        "/api/v1/auth/login" => Some(LimitedRoute::Login(ActorKind::User)),
        "/api/admin/auth/login" => Some(LimitedRoute::Login(ActorKind::Admin)),
        "/api/upload/image" => Some(LimitedRoute::Upload(ActorKind::User, "image")),
        "/api/upload/video" => Some(LimitedRoute::Upload(ActorKind::User, "video")),
        "/api/admin/upload/image" => Some(LimitedRoute::Upload(ActorKind::Admin, "image")),
        "/api/admin/upload/video" => Some(LimitedRoute::Upload(ActorKind::Admin, "video")),
        _ => None,
    }
}

fn is_content_type(req_content_type: Option<&str>, expected: &str) -> bool {
    req_content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(expected))
}

/// Reads the `identifier` field of a JSON or urlencoded login body. Anything
/// unreadable yields an empty identifier; the handler reports the real error.
async fn login_identifier(content_type: Option<&str>, bytes: &Bytes) -> String {
    let rebuilt = |ct: &str| {
        Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, ct)
            .body(Body::from(bytes.clone()))
    };

    if is_content_type(content_type, "application/json") {
        if let Ok(req) = rebuilt("application/json") {
            if let Ok(Json(value)) = Json::<Value>::from_request(req, &()).await {
                return value
                    .get("identifier")
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
            }
        }
    } else if is_content_type(content_type, "application/x-www-form-urlencoded") {
        if let Ok(req) = rebuilt("application/x-www-form-urlencoded") {
            if let Ok(Form(fields)) = Form::<HashMap<String, String>>::from_request(req, &()).await
            {
                return fields
                    .get("identifier")
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
            }
        }
    }
    String::new()
}

fn upload_subject(req: &Request, actor: ActorKind, client_ip: &str) -> String {
    let principal = match actor {
        ActorKind::User => req
            .extensions()
            .get::<CurrentUser>()
            .map(|u| u.id.to_string()),
        ActorKind::Admin => req
            .extensions()
            .get::<CurrentAdmin>()
            .map(|a| a.id.to_string()),
    };
    principal.unwrap_or_else(|| client_ip.to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(route) = classify(req.method(), req.uri().path()) else {
        return next.run(req).await;
    };

    let (parts, body) = req.into_parts();
    let client_ip = ClientIp::from_parts(&parts).0;

    match route {
        LimitedRoute::Login(actor) => {
            let bytes = match to_bytes(body, MAX_LOGIN_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(error = %err, "Unreadable login body");
                    return AppError::validation("validation error: invalid request body")
                        .into_response();
                }
            };
            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let identifier = login_identifier(content_type, &bytes).await;

            let decision = state
                .rate_limiter
                .check_login(actor, &client_ip, &identifier)
                .await;
            if decision == RateLimitDecision::Deny {
                return AppError::too_many_requests().into_response();
            }

            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        LimitedRoute::Upload(actor, kind) => {
            let req = Request::from_parts(parts, body);
            let subject = upload_subject(&req, actor, &client_ip);

            let decision = state
                .rate_limiter
                .check_upload(actor, &subject, kind)
                .await;
            if decision == RateLimitDecision::Deny {
                return AppError::too_many_requests().into_response();
            }

            next.run(req).await
        }
    }
}
