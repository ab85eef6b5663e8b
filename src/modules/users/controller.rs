use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use kxl_core::{ApiResponse, AppError};
use kxl_models::ChangePasswordDto;
use tracing::instrument;

use super::service::UserService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::cookies::clear_session_cookie;
use crate::validator::ValidatedJson;

/// Change the password of the logged-in user
///
/// Every session of the user, including this one, stops working.
#[utoipa::path(
    post,
    path = "/api/v1/users/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed; cookie cleared"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not logged in or wrong old password", body = ErrorResponse)
    ),
    security(("user_session" = [])),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthUser(current): AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<(CookieJar, ApiResponse<()>), AppError> {
    UserService::change_password(&state, &current, dto).await?;
    let jar = clear_session_cookie(jar, &state.config.session.user_cookie_name);
    Ok((jar, ApiResponse::empty()))
}
