use kxl_core::AppError;
use kxl_core::password::hash_password_with_cost;
use kxl_core::permissions::SUPER_ADMIN_ROLE;
use kxl_models::{
    Admin, AdminChanges, AdminId, CreateAdminDto, NewAdmin, PrincipalStatus, UpdateAdminDto,
};
use tracing::{info, instrument};

use crate::state::AppState;
use crate::utils::conflict::conflict_or_internal;

const DUPLICATE_USERNAME: &str = "conflict: username already exists";
const LAST_SUPER_ADMIN: &str = "conflict: cannot remove the last super_admin";

pub struct AdminService;

impl AdminService {
    #[instrument(skip(state))]
    pub async fn list_admins(state: &AppState) -> Result<Vec<Admin>, AppError> {
        Ok(state.principals.list_admins().await?)
    }

    #[instrument(skip_all, fields(admin.username = %dto.username, rbac.role = %dto.role))]
    pub async fn create_admin(state: &AppState, dto: CreateAdminDto) -> Result<Admin, AppError> {
        let role = dto.role.trim().to_string();
        ensure_role_exists(state, &role).await?;

        let password_hash =
            hash_password_with_cost(&dto.password, state.config.security.password_hash_cost)?;

        let admin = state
            .principals
            .create_admin(NewAdmin {
                username: dto.username.trim().to_string(),
                password_hash,
                role,
                status: dto.status.unwrap_or(PrincipalStatus::Active),
            })
            .await
            .map_err(conflict_or_internal(DUPLICATE_USERNAME))?;

        info!(admin.id = %admin.id, "Admin created");
        Ok(admin)
    }

    /// Replaces username, role and status. A disabled admin is rejected by
    /// the admin gate on its next request.
    #[instrument(skip(state, dto))]
    pub async fn update_admin(
        state: &AppState,
        id: AdminId,
        dto: UpdateAdminDto,
    ) -> Result<Admin, AppError> {
        let existing = find_admin(state, id).await?;
        let role = dto.role.trim().to_string();
        ensure_role_exists(state, &role).await?;
        let status = dto.status.unwrap_or(existing.status);

        let loses_super_admin = existing.role == SUPER_ADMIN_ROLE
            && (role != SUPER_ADMIN_ROLE || status == PrincipalStatus::Disabled);
        if loses_super_admin {
            ensure_not_last_super_admin(state).await?;
        }

        let admin = state
            .principals
            .update_admin(
                id,
                AdminChanges {
                    username: dto.username.trim().to_string(),
                    role,
                    status,
                },
            )
            .await
            .map_err(conflict_or_internal(DUPLICATE_USERNAME))?
            .ok_or_else(|| AppError::not_found("not found: admin"))?;

        info!(admin.id = %admin.id, rbac.role = %admin.role, "Admin updated");
        Ok(admin)
    }

    #[instrument(skip(state))]
    pub async fn delete_admin(state: &AppState, id: AdminId) -> Result<(), AppError> {
        let existing = find_admin(state, id).await?;
        if existing.role == SUPER_ADMIN_ROLE {
            ensure_not_last_super_admin(state).await?;
        }

        if !state.principals.delete_admin(id).await? {
            return Err(AppError::not_found("not found: admin"));
        }

        info!(admin.id = %id, "Admin deleted");
        Ok(())
    }
}

async fn find_admin(state: &AppState, id: AdminId) -> Result<Admin, AppError> {
    state
        .principals
        .find_admin_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("not found: admin"))
}

async fn ensure_role_exists(state: &AppState, role: &str) -> Result<(), AppError> {
    if state.roles.find_role(role).await?.is_none() {
        return Err(AppError::validation("validation error: unknown role"));
    }
    Ok(())
}

async fn ensure_not_last_super_admin(state: &AppState) -> Result<(), AppError> {
    if state.principals.count_admins_with_role(SUPER_ADMIN_ROLE).await? <= 1 {
        return Err(AppError::conflict(LAST_SUPER_ADMIN));
    }
    Ok(())
}
