use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use kxl_auth::{CurrentAdmin, CurrentUser};
use kxl_core::{AppError, permissions};

use crate::state::AppState;
use crate::utils::cookies::session_token;

/// Route gate for end-user endpoints. Resolves the user session cookie and
/// stores the [`CurrentUser`] in the request extensions.
pub async fn require_user(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&jar, &state.config.session.user_cookie_name);
    let current = state.authenticator.authenticate_user(token).await?;
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Route gate for admin endpoints. Resolves the admin session cookie and
/// stores the [`CurrentAdmin`], permissions included, in the request
/// extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&jar, &state.config.session.admin_cookie_name);
    let current = state.authenticator.authenticate_admin(token).await?;
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Authenticated user. Taken from the extensions when a gate already ran,
/// otherwise authenticated from the cookie.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(Self(current.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, &state.config.session.user_cookie_name);
        let current = state.authenticator.authenticate_user(token).await?;
        parts.extensions.insert(current.clone());
        Ok(Self(current))
    }
}

/// Authenticated admin.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub CurrentAdmin);

impl AuthAdmin {
    pub fn has_permission(&self, code: &str) -> bool {
        self.0.has_permission(code)
    }

    pub fn has_any_permission(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.has_permission(code))
    }
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentAdmin>() {
            return Ok(Self(current.clone()));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, &state.config.session.admin_cookie_name);
        let current = state.authenticator.authenticate_admin(token).await?;
        parts.extensions.insert(current.clone());
        Ok(Self(current))
    }
}

/// Declares an extractor that yields the [`AuthAdmin`] only when it holds at
/// least one of the listed permission codes, and `40301` otherwise.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $($permission:expr),+ $(,)?) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthAdmin);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = kxl_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let admin = <$crate::middleware::auth::AuthAdmin as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                if !admin.has_any_permission(&[$($permission),+]) {
                    return Err(kxl_core::AppError::forbidden());
                }

                Ok($name(admin))
            }
        }
    };
}

require_permission!(RequireUsersRead, permissions::USERS_READ);
require_permission!(RequireUsersWrite, permissions::USERS_WRITE);
require_permission!(RequireAdminsManage, permissions::ADMINS_MANAGE);
require_permission!(RequireRbacManage, permissions::RBAC_MANAGE);
require_permission!(
    RequireRolesRead,
    permissions::RBAC_MANAGE,
    permissions::ADMINS_MANAGE
);
