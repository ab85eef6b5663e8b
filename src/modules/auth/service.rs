use kxl_core::AppError;
use kxl_core::errors::codes;
use kxl_core::password::{hash_password_with_cost, verify_password};
use kxl_models::{LoginRequest, NewUser, RegisterUserDto, User};
use tracing::{info, instrument, warn};

use crate::state::AppState;
use crate::utils::conflict::conflict_or_internal;

pub struct AuthService;

impl AuthService {
    #[instrument(skip_all, fields(user.username = %dto.username))]
    pub async fn register_user(state: &AppState, dto: RegisterUserDto) -> Result<User, AppError> {
        let username = dto.username.trim().to_string();
        let email = dto.email.trim().to_string();

        if state.principals.user_exists_by_username(&username).await? {
            return Err(AppError::conflict("conflict: username already exists"));
        }
        if state.principals.user_exists_by_email(&email).await? {
            return Err(AppError::conflict("conflict: email already exists"));
        }

        let password_hash =
            hash_password_with_cost(&dto.password, state.config.security.password_hash_cost)?;

        let user = state
            .principals
            .create_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(conflict_or_internal("conflict: username or email already exists"))?;

        info!(user.id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and opens a session. Returns the user and the new
    /// session token.
    #[instrument(skip_all)]
    pub async fn login_user(state: &AppState, dto: LoginRequest) -> Result<(User, String), AppError> {
        let identifier = dto.identifier.trim();
        let Some(user) = state.principals.find_user_by_identifier(identifier).await? else {
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &user.password_hash) {
            warn!(user.id = %user.id, "Login rejected: wrong password");
            return Err(invalid_credentials());
        }

        if !user.status.is_active() {
            warn!(user.id = %user.id, "Login rejected: account disabled");
            return Err(AppError::new(codes::FORBIDDEN, "forbidden: account disabled"));
        }

        let token = state
            .sessions
            .create_user_session(user.id, user.session_version)
            .await?;

        info!(user.id = %user.id, "User logged in");
        Ok((user, token))
    }

    #[instrument(skip_all)]
    pub async fn logout_user(state: &AppState, token: &str) -> Result<(), AppError> {
        state.sessions.delete_user_session(token).await?;
        Ok(())
    }
}

pub(crate) fn invalid_credentials() -> AppError {
    AppError::new(codes::UNAUTHORIZED, "unauthorized: invalid credentials")
}
