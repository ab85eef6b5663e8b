//! Session token to principal resolution.
//!
//! Every protected request runs the same sequence, stopping at the first
//! failure:
//!
//! 1. No token: 401.
//! 2. Session lookup. Absent: 401. Store error: 500.
//! 3. Payload without a usable principal id: delete, 401.
//! 4. Principal lookup. Absent: delete, 401. Database error: 500.
//! 5. Principal disabled, or (users only) session version behind the stored
//!    one: delete, 401.
//!
//! The deletes are best-effort; a failure there is logged and the request is
//! still rejected.

use std::sync::Arc;

use kxl_cache::CacheError;
use kxl_core::AppError;
use kxl_db::PrincipalRepository;
use kxl_models::{Admin, AdminId, User, UserId};
use tracing::{debug, instrument, warn};

use crate::rbac::{self, RbacService};
use crate::session::SessionStore;

/// Authenticated end user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    /// Token the request was authenticated with.
    pub session_token: String,
    pub user: User,
}

/// Authenticated admin with the permissions of its role.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: AdminId,
    pub role: String,
    pub permissions: Vec<String>,
    pub session_token: String,
    pub admin: Admin,
}

impl CurrentAdmin {
    #[must_use]
    pub fn has_permission(&self, code: &str) -> bool {
        rbac::has_permission(&self.role, &self.permissions, code)
    }

    pub fn require_permission(&self, code: &str) -> Result<(), AppError> {
        rbac::require_permission(&self.role, &self.permissions, code)
    }
}

fn backend_error(err: CacheError) -> AppError {
    AppError::internal(anyhow::Error::new(err).context("session lookup failed"))
}

#[derive(Clone)]
pub struct Authenticator {
    sessions: SessionStore,
    principals: Arc<dyn PrincipalRepository>,
    rbac: RbacService,
}

impl Authenticator {
    pub fn new(
        sessions: SessionStore,
        principals: Arc<dyn PrincipalRepository>,
        rbac: RbacService,
    ) -> Self {
        Self {
            sessions,
            principals,
            rbac,
        }
    }

    #[instrument(skip_all)]
    pub async fn authenticate_user(&self, token: Option<&str>) -> Result<CurrentUser, AppError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(AppError::unauthorized)?;

        let session = match self.sessions.get_user_session(token).await {
            Ok(Some(session)) => session,
            Ok(None) => return Err(AppError::unauthorized()),
            Err(CacheError::Serialization(err)) => {
                debug!(error = %err, "Unreadable user session");
                return Err(self.reject_user(token).await);
            }
            Err(err) => return Err(backend_error(err)),
        };

        let Ok(user_id) = session.user_id.parse::<UserId>() else {
            return Err(self.reject_user(token).await);
        };

        let user = self
            .principals
            .find_user_by_id(user_id)
            .await
            .map_err(AppError::internal)?;
        let Some(user) = user else {
            return Err(self.reject_user(token).await);
        };

        if !user.status.is_active() || session.user_session_version != user.session_version {
            debug!(user.id = %user.id, "Stale user session");
            return Err(self.reject_user(token).await);
        }

        Ok(CurrentUser {
            id: user.id,
            session_token: token.to_string(),
            user,
        })
    }

    #[instrument(skip_all)]
    pub async fn authenticate_admin(&self, token: Option<&str>) -> Result<CurrentAdmin, AppError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(AppError::unauthorized)?;

        let session = match self.sessions.get_admin_session(token).await {
            Ok(Some(session)) => session,
            Ok(None) => return Err(AppError::unauthorized()),
            Err(CacheError::Serialization(err)) => {
                debug!(error = %err, "Unreadable admin session");
                return Err(self.reject_admin(token).await);
            }
            Err(err) => return Err(backend_error(err)),
        };

        let Ok(admin_id) = session.admin_id.parse::<AdminId>() else {
            return Err(self.reject_admin(token).await);
        };

        let admin = self
            .principals
            .find_admin_by_id(admin_id)
            .await
            .map_err(AppError::internal)?;
        let Some(admin) = admin else {
            return Err(self.reject_admin(token).await);
        };

        if !admin.status.is_active() {
            debug!(admin.id = %admin.id, "Disabled admin session");
            return Err(self.reject_admin(token).await);
        }

        let permissions = match self.rbac.cached_permissions_for_role(&admin.role).await {
            Ok(permissions) => permissions,
            Err(err) => {
                warn!(admin.role = %admin.role, error = %err, "Permission lookup failed");
                Vec::new()
            }
        };

        Ok(CurrentAdmin {
            id: admin.id,
            role: admin.role.clone(),
            permissions,
            session_token: token.to_string(),
            admin,
        })
    }

    async fn reject_user(&self, token: &str) -> AppError {
        if let Err(err) = self.sessions.delete_user_session(token).await {
            warn!(error = %err, "Failed to delete rejected user session");
        }
        AppError::unauthorized()
    }

    async fn reject_admin(&self, token: &str) -> AppError {
        if let Err(err) = self.sessions.delete_admin_session(token).await {
            warn!(error = %err, "Failed to delete rejected admin session");
        }
        AppError::unauthorized()
    }
}
