//! # KXL CLI
//!
//! Administrative tasks that must not be reachable over HTTP. The first
//! admin account is created here; every later one can be created through
//! the admin API.

use anyhow::{Context, bail};
use kxl_core::password::hash_password_with_cost;
use kxl_db::{DbError, PrincipalRepository, RolePermissionRepository};
use kxl_models::{Admin, NewAdmin, PrincipalStatus};

/// Creates an active admin with `role`, which must already exist.
///
/// # Errors
///
/// Fails on a blank username or password, an unknown role, a taken username
/// or a database error.
pub async fn create_admin(
    principals: &dyn PrincipalRepository,
    roles: &dyn RolePermissionRepository,
    username: &str,
    password: &str,
    role: &str,
    hash_cost: u32,
) -> anyhow::Result<Admin> {
    let username = username.trim();
    if username.is_empty() {
        bail!("username must not be empty");
    }
    if password.is_empty() {
        bail!("password must not be empty");
    }
    if roles.find_role(role).await?.is_none() {
        bail!("unknown role: {role}");
    }

    let password_hash = hash_password_with_cost(password, hash_cost)
        .map_err(|err| anyhow::anyhow!(err.message))?;

    match principals
        .create_admin(NewAdmin {
            username: username.to_string(),
            password_hash,
            role: role.to_string(),
            status: PrincipalStatus::Active,
        })
        .await
    {
        Ok(admin) => Ok(admin),
        Err(DbError::Conflict(_)) => bail!("an admin named {username} already exists"),
        Err(err) => Err(err).context("failed to create admin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kxl_db::{MemoryPrincipalRepository, MemoryRolePermissionRepository};

    #[tokio::test]
    async fn test_create_admin() {
        let principals = MemoryPrincipalRepository::new();
        let roles = MemoryRolePermissionRepository::seeded();

        let admin = create_admin(&principals, &roles, " root ", "secret", "super_admin", 4)
            .await
            .unwrap();
        assert_eq!(admin.username, "root");
        assert_eq!(admin.role, "super_admin");
        assert!(admin.status.is_active());
        assert!(kxl_core::verify_password("secret", &admin.password_hash));
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let principals = MemoryPrincipalRepository::new();
        let roles = MemoryRolePermissionRepository::seeded();

        let err = create_admin(&principals, &roles, "root", "secret", "ghost", 4)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown role"));
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let principals = MemoryPrincipalRepository::new();
        let roles = MemoryRolePermissionRepository::seeded();

        create_admin(&principals, &roles, "root", "secret", "admin", 4)
            .await
            .unwrap();
        let err = create_admin(&principals, &roles, "root", "other", "admin", 4)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_blank_input() {
        let principals = MemoryPrincipalRepository::new();
        let roles = MemoryRolePermissionRepository::seeded();

        assert!(create_admin(&principals, &roles, "  ", "secret", "admin", 4).await.is_err());
        assert!(create_admin(&principals, &roles, "root", "", "admin", 4).await.is_err());
    }
}
