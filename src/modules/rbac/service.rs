use kxl_core::AppError;
use kxl_core::permissions::{ADMIN_ROLE, SUPER_ADMIN_ROLE};
use kxl_models::{AdminPermission, AdminRole, CreateRoleDto, SetRolePermissionsDto, UpdateRoleDto};
use tracing::{info, instrument};

use super::model::RolePermissions;
use crate::state::AppState;
use crate::utils::conflict::conflict_or_internal;

const ROLE_NOT_FOUND: &str = "not found: role";

/// Role codes are lowercase ASCII letters, digits and `_`.
fn is_valid_role_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

pub struct RbacAdminService;

impl RbacAdminService {
    #[instrument(skip(state))]
    pub async fn list_roles(state: &AppState) -> Result<Vec<AdminRole>, AppError> {
        Ok(state.roles.list_roles().await?)
    }

    #[instrument(skip(state))]
    pub async fn list_permissions(state: &AppState) -> Result<Vec<AdminPermission>, AppError> {
        Ok(state.roles.list_permissions().await?)
    }

    /// Durable permission set of a role, bypassing the cache.
    #[instrument(skip(state))]
    pub async fn role_permissions(state: &AppState, code: &str) -> Result<RolePermissions, AppError> {
        if state.roles.find_role(code).await?.is_none() {
            return Err(AppError::not_found(ROLE_NOT_FOUND));
        }
        let permission_codes = state.rbac.permissions_for_role(code).await?;
        Ok(RolePermissions {
            role: code.to_string(),
            permission_codes,
        })
    }

    /// Replaces the permission set of a role and drops its cache entry
    /// before returning.
    #[instrument(skip(state, dto), fields(rbac.role = %code))]
    pub async fn set_role_permissions(
        state: &AppState,
        code: &str,
        dto: SetRolePermissionsDto,
    ) -> Result<RolePermissions, AppError> {
        if code == SUPER_ADMIN_ROLE {
            return Err(AppError::conflict(
                "conflict: super_admin permissions cannot be changed",
            ));
        }
        if state.roles.find_role(code).await?.is_none() {
            return Err(AppError::not_found(ROLE_NOT_FOUND));
        }

        let codes = dto.normalized_codes();
        let known = state.roles.count_permissions(&codes).await?;
        if usize::try_from(known).ok() != Some(codes.len()) {
            return Err(AppError::validation(
                "validation error: unknown permission code",
            ));
        }

        state.roles.replace_role_permissions(code, &codes).await?;
        state.rbac.invalidate(code).await;

        info!(count = codes.len(), "Role permissions replaced");
        Ok(RolePermissions {
            role: code.to_string(),
            permission_codes: codes,
        })
    }

    #[instrument(skip_all, fields(rbac.role = %dto.code))]
    pub async fn create_role(state: &AppState, dto: CreateRoleDto) -> Result<AdminRole, AppError> {
        let code = dto.code.trim();
        if !is_valid_role_code(code) {
            return Err(AppError::validation("validation error: invalid role code"));
        }
        if state.roles.find_role(code).await?.is_some() {
            return Err(AppError::conflict("conflict: role already exists"));
        }

        let role = state
            .roles
            .create_role(code, dto.name.trim(), dto.description.trim())
            .await
            .map_err(conflict_or_internal("conflict: role already exists"))?;

        info!("Role created");
        Ok(role)
    }

    #[instrument(skip(state, dto))]
    pub async fn update_role(
        state: &AppState,
        code: &str,
        dto: UpdateRoleDto,
    ) -> Result<AdminRole, AppError> {
        state
            .roles
            .update_role(code, dto.name.trim(), dto.description.trim())
            .await?
            .ok_or_else(|| AppError::not_found(ROLE_NOT_FOUND))
    }

    /// Built-in roles and roles still held by an admin cannot be deleted.
    #[instrument(skip(state))]
    pub async fn delete_role(state: &AppState, code: &str) -> Result<(), AppError> {
        if code == SUPER_ADMIN_ROLE || code == ADMIN_ROLE {
            return Err(AppError::conflict("conflict: built-in role cannot be deleted"));
        }
        let Some(role) = state.roles.find_role(code).await? else {
            return Err(AppError::not_found(ROLE_NOT_FOUND));
        };
        if role.is_system {
            return Err(AppError::conflict("conflict: built-in role cannot be deleted"));
        }
        if state.principals.count_admins_with_role(code).await? > 0 {
            return Err(AppError::conflict("conflict: role is assigned to admins"));
        }

        if !state.roles.delete_role(code).await? {
            return Err(AppError::not_found(ROLE_NOT_FOUND));
        }
        state.rbac.invalidate(code).await;

        info!(rbac.role = %code, "Role deleted");
        Ok(())
    }
}
