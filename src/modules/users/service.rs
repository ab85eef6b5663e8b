use kxl_auth::CurrentUser;
use kxl_core::AppError;
use kxl_core::password::{hash_password_with_cost, verify_password};
use kxl_models::ChangePasswordDto;
use tracing::{info, instrument, warn};

use crate::modules::auth::service::invalid_credentials;
use crate::state::AppState;

pub struct UserService;

impl UserService {
    /// Replaces the password and bumps `session_version`, which logs the user
    /// out everywhere. The current session is deleted outright.
    #[instrument(skip_all, fields(user.id = %current.id))]
    pub async fn change_password(
        state: &AppState,
        current: &CurrentUser,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        if !verify_password(&dto.old_password, &current.user.password_hash) {
            warn!("Password change rejected: wrong old password");
            return Err(invalid_credentials());
        }

        let password_hash =
            hash_password_with_cost(&dto.new_password, state.config.security.password_hash_cost)?;

        if state
            .principals
            .update_user_password(current.id, &password_hash)
            .await?
            .is_none()
        {
            return Err(AppError::unauthorized());
        }

        state
            .sessions
            .delete_user_session(&current.session_token)
            .await?;

        info!("Password changed");
        Ok(())
    }
}
