use kxl_core::AppError;
use kxl_core::errors::codes;
use kxl_core::password::verify_password;
use kxl_models::{AdminProfile, AdminWithPermissions, LoginRequest};
use tracing::{info, instrument, warn};

use crate::modules::auth::service::invalid_credentials;
use crate::state::AppState;

pub struct AdminAuthService;

impl AdminAuthService {
    /// Checks admin credentials and opens an admin session. Returns the
    /// profile with its role's permissions and the new session token.
    #[instrument(skip_all)]
    pub async fn login_admin(
        state: &AppState,
        dto: LoginRequest,
    ) -> Result<(AdminWithPermissions, String), AppError> {
        let username = dto.identifier.trim();
        let Some(admin) = state.principals.find_admin_by_username(username).await? else {
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &admin.password_hash) {
            warn!(admin.id = %admin.id, "Admin login rejected: wrong password");
            return Err(invalid_credentials());
        }

        if !admin.status.is_active() {
            warn!(admin.id = %admin.id, "Admin login rejected: account disabled");
            return Err(AppError::new(codes::FORBIDDEN, "forbidden: account disabled"));
        }

        let permissions = state.rbac.cached_permissions_for_role(&admin.role).await?;
        let token = state.sessions.create_admin_session(admin.id).await?;

        info!(admin.id = %admin.id, rbac.role = %admin.role, "Admin logged in");
        Ok((
            AdminWithPermissions {
                profile: AdminProfile::from(&admin),
                permissions,
            },
            token,
        ))
    }

    #[instrument(skip_all)]
    pub async fn logout_admin(state: &AppState, token: &str) -> Result<(), AppError> {
        state.sessions.delete_admin_session(token).await?;
        Ok(())
    }
}
