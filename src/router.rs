use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use kxl_core::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::auth::require_admin;
use crate::middleware::error_detail::expose_error_detail;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::middleware::timeout::request_timeout;
use crate::modules::admin_auth::init_admin_auth_router;
use crate::modules::admin_users::init_admin_users_router;
use crate::modules::admins::init_admins_router;
use crate::modules::auth::init_auth_router;
use crate::modules::health::init_health_router;
use crate::modules::rbac::init_rbac_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

/// Unknown routes and unsupported methods.
async fn not_found() -> AppError {
    AppError::not_found("not found")
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let cors = &state.config.cors;
    let origin = if cors.allows_any() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = cors
            .allow_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let admin_gate = || middleware::from_fn_with_state(state.clone(), require_admin);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router(state.clone()))
                .nest("/users", init_users_router(state.clone())),
        )
        .nest(
            "/api/admin",
            Router::new()
                .nest("/auth", init_admin_auth_router(state.clone()))
                .nest("/users", init_admin_users_router().route_layer(admin_gate()))
                .nest("/admins", init_admins_router().route_layer(admin_gate()))
                .nest("/rbac", init_rbac_router().route_layer(admin_gate())),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state.clone());

    if !state.config.app.is_production() {
        router = router.layer(middleware::from_fn(expose_error_detail));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn_with_state(
            Duration::from_secs(state.config.server.request_timeout_seconds),
            request_timeout,
        ))
        .layer(middleware::from_fn(logging_middleware))
}
