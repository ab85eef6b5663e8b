use axum::extract::{Path, State};
use kxl_core::{ApiResponse, AppError};
use kxl_models::{AdminProfile, CreateAdminDto, UpdateAdminDto};
use tracing::instrument;

use super::service::AdminService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::RequireAdminsManage;
use crate::state::AppState;
use crate::validator::{ValidatedJson, parse_path_id};

/// List admin accounts
#[utoipa::path(
    get,
    path = "/api/admin/admins",
    responses(
        (status = 200, description = "All admins", body = Vec<AdminProfile>),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn list_admins(
    State(state): State<AppState>,
    _admin: RequireAdminsManage,
) -> Result<ApiResponse<Vec<AdminProfile>>, AppError> {
    let admins = AdminService::list_admins(&state).await?;
    Ok(ApiResponse::success(
        admins.iter().map(AdminProfile::from).collect(),
    ))
}

/// Create an admin account
#[utoipa::path(
    post,
    path = "/api/admin/admins",
    request_body = CreateAdminDto,
    responses(
        (status = 200, description = "Created admin", body = AdminProfile),
        (status = 400, description = "Validation error or unknown role", body = ErrorResponse),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn create_admin(
    State(state): State<AppState>,
    _admin: RequireAdminsManage,
    ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
) -> Result<ApiResponse<AdminProfile>, AppError> {
    let admin = AdminService::create_admin(&state, dto).await?;
    Ok(ApiResponse::success(AdminProfile::from(&admin)))
}

/// Update an admin account
#[utoipa::path(
    put,
    path = "/api/admin/admins/{id}",
    params(("id" = String, Path, description = "Admin id")),
    request_body = UpdateAdminDto,
    responses(
        (status = 200, description = "Updated admin", body = AdminProfile),
        (status = 400, description = "Validation error or unknown role", body = ErrorResponse),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse),
        (status = 404, description = "No such admin", body = ErrorResponse),
        (status = 409, description = "Duplicate username or last super_admin", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn update_admin(
    State(state): State<AppState>,
    _admin: RequireAdminsManage,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateAdminDto>,
) -> Result<ApiResponse<AdminProfile>, AppError> {
    let admin = AdminService::update_admin(&state, parse_path_id(&id)?, dto).await?;
    Ok(ApiResponse::success(AdminProfile::from(&admin)))
}

/// Delete an admin account
#[utoipa::path(
    delete,
    path = "/api/admin/admins/{id}",
    params(("id" = String, Path, description = "Admin id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Missing admins:manage", body = ErrorResponse),
        (status = 404, description = "No such admin", body = ErrorResponse),
        (status = 409, description = "Last super_admin", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn delete_admin(
    State(state): State<AppState>,
    _admin: RequireAdminsManage,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    AdminService::delete_admin(&state, parse_path_id(&id)?).await?;
    Ok(ApiResponse::empty())
}
