use axum::extract::{Path, Query, State};
use kxl_core::{ApiResponse, AppError, PageParams, Paged};
use kxl_models::{UpdateUserStatusDto, UserFilterParams, UserProfile};
use tracing::instrument;

use super::service::AdminUserService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequireUsersRead, RequireUsersWrite};
use crate::state::AppState;
use crate::validator::{ValidatedJson, parse_path_id};

/// List end users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PageParams, UserFilterParams),
    responses(
        (status = 200, description = "One page of users", body = Vec<UserProfile>),
        (status = 400, description = "Invalid paging", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Missing users:read", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admin Users"
)]
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireUsersRead,
    Query(page): Query<PageParams>,
    Query(filter): Query<UserFilterParams>,
) -> Result<ApiResponse<Paged<UserProfile>>, AppError> {
    let page = page.resolve()?;
    let users = AdminUserService::list_users(&state, page, filter).await?;
    Ok(ApiResponse::success(users.map(UserProfile::from)))
}

/// Get one end user
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserProfile),
        (status = 403, description = "Missing users:read", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admin Users"
)]
#[instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    _admin: RequireUsersRead,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserProfile>, AppError> {
    let user = AdminUserService::get_user(&state, parse_path_id(&id)?).await?;
    Ok(ApiResponse::success(UserProfile::from(user)))
}

/// Enable or disable an end user
///
/// Disabling ends every session the user holds.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/status",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserStatusDto,
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Missing users:write", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admin Users"
)]
#[instrument(skip_all)]
pub async fn update_user_status(
    State(state): State<AppState>,
    _admin: RequireUsersWrite,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserStatusDto>,
) -> Result<ApiResponse<UserProfile>, AppError> {
    let user = AdminUserService::update_status(&state, parse_path_id(&id)?, dto.status).await?;
    Ok(ApiResponse::success(UserProfile::from(user)))
}
