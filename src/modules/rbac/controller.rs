use axum::extract::{Path, State};
use kxl_core::{ApiResponse, AppError};
use kxl_models::{AdminPermission, AdminRole, CreateRoleDto, SetRolePermissionsDto, UpdateRoleDto};
use tracing::instrument;

use super::model::RolePermissions;
use super::service::RbacAdminService;
use crate::docs::ErrorResponse;
use crate::middleware::auth::{RequireRbacManage, RequireRolesRead};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List roles
#[utoipa::path(
    get,
    path = "/api/admin/rbac/roles",
    responses(
        (status = 200, description = "All roles", body = Vec<AdminRole>),
        (status = 403, description = "Missing rbac:manage and admins:manage", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "RBAC"
)]
#[instrument(skip_all)]
pub async fn list_roles(
    State(state): State<AppState>,
    _admin: RequireRolesRead,
) -> Result<ApiResponse<Vec<AdminRole>>, AppError> {
    Ok(ApiResponse::success(RbacAdminService::list_roles(&state).await?))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/api/admin/rbac/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 200, description = "Created role", body = AdminRole),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Missing rbac:manage", body = ErrorResponse),
        (status = 409, description = "Role code already exists", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "RBAC"
)]
#[instrument(skip_all)]
pub async fn create_role(
    State(state): State<AppState>,
    _admin: RequireRbacManage,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<ApiResponse<AdminRole>, AppError> {
    Ok(ApiResponse::success(
        RbacAdminService::create_role(&state, dto).await?,
    ))
}

/// Rename or re-describe a role
#[utoipa::path(
    put,
    path = "/api/admin/rbac/roles/{code}",
    params(("code" = String, Path, description = "Role code")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Updated role", body = AdminRole),
        (status = 403, description = "Missing rbac:manage", body = ErrorResponse),
        (status = 404, description = "No such role", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "RBAC"
)]
#[instrument(skip_all)]
pub async fn update_role(
    State(state): State<AppState>,
    _admin: RequireRbacManage,
    Path(code): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> Result<ApiResponse<AdminRole>, AppError> {
    Ok(ApiResponse::success(
        RbacAdminService::update_role(&state, &code, dto).await?,
    ))
}

/// Delete a role
#[utoipa::path(
    delete,
    path = "/api/admin/rbac/roles/{code}",
    params(("code" = String, Path, description = "Role code")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Missing rbac:manage", body = ErrorResponse),
        (status = 404, description = "No such role", body = ErrorResponse),
        (status = 409, description = "Built-in role or still assigned", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "RBAC"
)]
#[instrument(skip_all)]
pub async fn delete_role(
    State(state): State<AppState>,
    _admin: RequireRbacManage,
    Path(code): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    RbacAdminService::delete_role(&state, &code).await?;
    Ok(ApiResponse::empty())
}

/// List every permission code
#[utoipa::path(
    get,
    path = "/api/admin/rbac/permissions",
    responses(
        (status = 200, description = "Permission catalogue", body = Vec<AdminPermission>),
        (status = 403, description = "Missing rbac:manage", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "RBAC"
)]
#[instrument(skip_all)]
pub async fn list_permissions(
    State(state): State<AppState>,
    _admin: RequireRbacManage,
) -> Result<ApiResponse<Vec<AdminPermission>>, AppError> {
    Ok(ApiResponse::success(
        RbacAdminService::list_permissions(&state).await?,
    ))
}

/// Permission codes granted to a role
#[utoipa::path(
    get,
    path = "/api/admin/rbac/roles/{code}/permissions",
    params(("code" = String, Path, description = "Role code")),
    responses(
        (status = 200, description = "Role permissions", body = RolePermissions),
        (status = 403, description = "Missing rbac:manage", body = ErrorResponse),
        (status = 404, description = "No such role", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "RBAC"
)]
#[instrument(skip_all)]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    _admin: RequireRbacManage,
    Path(code): Path<String>,
) -> Result<ApiResponse<RolePermissions>, AppError> {
    Ok(ApiResponse::success(
        RbacAdminService::role_permissions(&state, &code).await?,
    ))
}

/// Replace the permission codes of a role
///
/// The role's cached permission set is dropped before the response is sent.
#[utoipa::path(
    put,
    path = "/api/admin/rbac/roles/{code}/permissions",
    params(("code" = String, Path, description = "Role code")),
    request_body = SetRolePermissionsDto,
    responses(
        (status = 200, description = "New permission set", body = RolePermissions),
        (status = 400, description = "Unknown permission code", body = ErrorResponse),
        (status = 403, description = "Missing rbac:manage", body = ErrorResponse),
        (status = 404, description = "No such role", body = ErrorResponse),
        (status = 409, description = "super_admin is fixed", body = ErrorResponse)
    ),
    security(("admin_session" = [])),
    tag = "RBAC"
)]
#[instrument(skip_all)]
pub async fn set_role_permissions(
    State(state): State<AppState>,
    _admin: RequireRbacManage,
    Path(code): Path<String>,
    ValidatedJson(dto): ValidatedJson<SetRolePermissionsDto>,
) -> Result<ApiResponse<RolePermissions>, AppError> {
    Ok(ApiResponse::success(
        RbacAdminService::set_role_permissions(&state, &code, dto).await?,
    ))
}
