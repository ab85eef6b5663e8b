use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use kxl_core::{ApiResponse, AppError};
use kxl_models::{LoginRequest, RegisterUserDto, UserProfile};
use tracing::instrument;

use super::service::AuthService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::cookies::{clear_session_cookie, session_cookie};
use crate::validator::ValidatedJson;

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterUserDto,
    responses(
        (status = 200, description = "User registered", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterUserDto>,
) -> Result<ApiResponse<UserProfile>, AppError> {
    let user = AuthService::register_user(&state, dto).await?;
    Ok(ApiResponse::success(UserProfile::from(user)))
}

/// Log in with username or email and receive the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account disabled", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<UserProfile>), AppError> {
    let (user, token) = AuthService::login_user(&state, dto).await?;
    let session = &state.config.session;
    let cookie = session_cookie(
        &session.user_cookie_name,
        token,
        state.sessions.user_ttl(),
        session.cookie_secure,
    );
    Ok((jar.add(cookie), ApiResponse::success(UserProfile::from(user))))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Session deleted; cookie cleared"),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    security(("user_session" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout_user(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthUser(current): AuthUser,
) -> Result<(CookieJar, ApiResponse<()>), AppError> {
    AuthService::logout_user(&state, &current.session_token).await?;
    let jar = clear_session_cookie(jar, &state.config.session.user_cookie_name);
    Ok((jar, ApiResponse::empty()))
}

/// Profile of the logged-in user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    security(("user_session" = [])),
    tag = "Authentication"
)]
pub async fn me(AuthUser(current): AuthUser) -> ApiResponse<UserProfile> {
    ApiResponse::success(UserProfile::from(&current.user))
}
