use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use kxl_core::{ApiResponse, AppError};
use kxl_models::{AdminProfile, AdminWithPermissions, LoginRequest};
use tracing::instrument;

use super::service::AdminAuthService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::AuthAdmin;
use crate::state::AppState;
use crate::utils::cookies::{clear_session_cookie, session_cookie};
use crate::validator::ValidatedJson;

/// Admin login
#[utoipa::path(
    post,
    path = "/api/admin/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; admin cookie set", body = AdminWithPermissions),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account disabled", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Admin Authentication"
)]
#[instrument(skip_all)]
pub async fn login_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<AdminWithPermissions>), AppError> {
    let (admin, token) = AdminAuthService::login_admin(&state, dto).await?;
    let session = &state.config.session;
    let cookie = session_cookie(
        &session.admin_cookie_name,
        token,
        state.sessions.admin_ttl(),
        session.cookie_secure,
    );
    Ok((jar.add(cookie), ApiResponse::success(admin)))
}

/// Admin logout
#[utoipa::path(
    post,
    path = "/api/admin/auth/logout",
    responses(
        (status = 200, description = "Session deleted; cookie cleared"),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admin Authentication"
)]
#[instrument(skip_all)]
pub async fn logout_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthAdmin(current): AuthAdmin,
) -> Result<(CookieJar, ApiResponse<()>), AppError> {
    AdminAuthService::logout_admin(&state, &current.session_token).await?;
    let jar = clear_session_cookie(jar, &state.config.session.admin_cookie_name);
    Ok((jar, ApiResponse::empty()))
}

/// Logged-in admin with its permissions
#[utoipa::path(
    get,
    path = "/api/admin/auth/me",
    responses(
        (status = 200, description = "Current admin", body = AdminWithPermissions),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admin Authentication"
)]
pub async fn me(AuthAdmin(current): AuthAdmin) -> ApiResponse<AdminWithPermissions> {
    ApiResponse::success(AdminWithPermissions {
        profile: AdminProfile::from(&current.admin),
        permissions: current.permissions,
    })
}
