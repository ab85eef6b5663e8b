//! Role to permission resolution.
//!
//! `super_admin` resolves to `["*"]` without touching storage. Every other
//! role is read from the role-permission repository through a TTL-bounded
//! cache entry at `rbac:role_permissions:{role}`.

use std::sync::Arc;
use std::time::Duration;

use kxl_cache::KeyValueStore;
use kxl_cache::keys::rbac;
use kxl_core::AppError;
use kxl_core::permissions::{SUPER_ADMIN_ROLE, WILDCARD};
use kxl_db::{DbError, RolePermissionRepository};
use tracing::{debug, instrument, warn};

/// `true` when `role` is `super_admin`, or `permissions` holds `"*"` or
/// exactly `code`.
#[must_use]
pub fn has_permission(role: &str, permissions: &[String], code: &str) -> bool {
    role == SUPER_ADMIN_ROLE || permissions.iter().any(|p| p == WILDCARD || p == code)
}

/// Like [`has_permission`] but yields `AppError::forbidden()` on a miss.
pub fn require_permission(role: &str, permissions: &[String], code: &str) -> Result<(), AppError> {
    if has_permission(role, permissions, code) {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

fn super_admin_permissions() -> Vec<String> {
    vec![WILDCARD.to_string()]
}

#[derive(Clone)]
pub struct RbacService {
    roles: Arc<dyn RolePermissionRepository>,
    cache: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl RbacService {
    pub fn new(
        roles: Arc<dyn RolePermissionRepository>,
        cache: Arc<dyn KeyValueStore>,
        ttl: Duration,
    ) -> Self {
        Self { roles, cache, ttl }
    }

    /// Durable permission codes of `role`, sorted.
    pub async fn permissions_for_role(&self, role: &str) -> Result<Vec<String>, DbError> {
        if role == SUPER_ADMIN_ROLE {
            return Ok(super_admin_permissions());
        }
        let mut codes = self.roles.list_permission_codes_for_role(role).await?;
        codes.sort();
        Ok(codes)
    }

    /// Cache-first variant of [`Self::permissions_for_role`]. Cache read and
    /// write failures degrade to a repository read.
    #[instrument(skip(self))]
    pub async fn cached_permissions_for_role(&self, role: &str) -> Result<Vec<String>, DbError> {
        if role == SUPER_ADMIN_ROLE {
            return Ok(super_admin_permissions());
        }

        let key = rbac::role_permissions(role);
        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(codes) => {
                    debug!(cache.key = %key, "Role permissions cache hit");
                    return Ok(codes);
                }
                Err(err) => warn!(cache.key = %key, error = %err, "Discarding unreadable role permissions"),
            },
            Ok(None) => debug!(cache.key = %key, "Role permissions cache miss"),
            Err(err) => warn!(cache.key = %key, error = %err, "Role permissions cache read failed"),
        }

        let codes = self.permissions_for_role(role).await?;

        match serde_json::to_string(&codes) {
            Ok(payload) => {
                if let Err(err) = self.cache.set_ex(&key, &payload, self.ttl).await {
                    warn!(cache.key = %key, error = %err, "Role permissions cache write failed");
                }
            }
            Err(err) => warn!(cache.key = %key, error = %err, "Role permissions not cacheable"),
        }

        Ok(codes)
    }

    /// Drops the cached entry for `role`. Backend failures are logged only.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, role: &str) {
        if role == SUPER_ADMIN_ROLE {
            return;
        }
        let key = rbac::role_permissions(role);
        match self.cache.del(&key).await {
            Ok(()) => debug!(cache.key = %key, "Role permissions invalidated"),
            Err(err) => warn!(cache.key = %key, error = %err, "Role permissions invalidation failed"),
        }
    }
}
