use kxl_core::{AppError, Page, Paged};
use kxl_models::{PrincipalStatus, User, UserFilterParams, UserId};
use tracing::{info, instrument};

use crate::state::AppState;

pub struct AdminUserService;

impl AdminUserService {
    #[instrument(skip(state))]
    pub async fn list_users(
        state: &AppState,
        page: Page,
        params: UserFilterParams,
    ) -> Result<Paged<User>, AppError> {
        let filter = params.into_filter(page.limit(), page.offset());
        let (users, total) = state.principals.list_users(&filter).await?;
        Ok(Paged::new(users, total, page.page, page.page_size))
    }

    #[instrument(skip(state))]
    pub async fn get_user(state: &AppState, id: UserId) -> Result<User, AppError> {
        state
            .principals
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("not found: user"))
    }

    /// Disabling a user bumps its `session_version`, so every open session
    /// fails its next check.
    #[instrument(skip(state))]
    pub async fn update_status(
        state: &AppState,
        id: UserId,
        status: PrincipalStatus,
    ) -> Result<User, AppError> {
        let user = state
            .principals
            .update_user_status(id, status)
            .await?
            .ok_or_else(|| AppError::not_found("not found: user"))?;

        info!(user.id = %user.id, status = i16::from(status), "User status updated");
        Ok(user)
    }
}
