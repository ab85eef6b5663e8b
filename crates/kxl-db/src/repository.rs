//! Repository traits.
//!
//! Absence is `Ok(None)`; `Err` is reserved for backend failures so callers
//! can tell "no such principal" apart from "database down".

use async_trait::async_trait;
use kxl_models::{
    Admin, AdminChanges, AdminId, AdminPermission, AdminRole, NewAdmin, NewUser,
    PrincipalStatus, User, UserFilter, UserId,
};

use crate::DbError;

#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    async fn ping(&self) -> Result<(), DbError>;

    // Users

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, DbError>;

    /// Looks a user up by username or email.
    async fn find_user_by_identifier(&self, identifier: &str) -> Result<Option<User>, DbError>;

    async fn user_exists_by_username(&self, username: &str) -> Result<bool, DbError>;

    async fn user_exists_by_email(&self, email: &str) -> Result<bool, DbError>;

    /// Inserts an active user with `session_version` 0.
    async fn create_user(&self, user: NewUser) -> Result<User, DbError>;

    /// Stores a new hash and increments `session_version`.
    async fn update_user_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<Option<User>, DbError>;

    /// Sets the status. Moving to `Disabled` increments `session_version`;
    /// setting the current status again changes nothing.
    async fn update_user_status(
        &self,
        id: UserId,
        status: PrincipalStatus,
    ) -> Result<Option<User>, DbError>;

    /// One page of users, newest first, plus the total match count.
    async fn list_users(&self, filter: &UserFilter) -> Result<(Vec<User>, i64), DbError>;

    // Admins

    async fn find_admin_by_id(&self, id: AdminId) -> Result<Option<Admin>, DbError>;

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, DbError>;

    /// Newest first.
    async fn list_admins(&self) -> Result<Vec<Admin>, DbError>;

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, DbError>;

    async fn update_admin(
        &self,
        id: AdminId,
        changes: AdminChanges,
    ) -> Result<Option<Admin>, DbError>;

    /// Returns whether a row was deleted.
    async fn delete_admin(&self, id: AdminId) -> Result<bool, DbError>;

    async fn count_admins_with_role(&self, role: &str) -> Result<i64, DbError>;
}

#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    /// Permission codes granted to `role`, sorted ascending.
    async fn list_permission_codes_for_role(&self, role: &str) -> Result<Vec<String>, DbError>;

    async fn find_role(&self, code: &str) -> Result<Option<AdminRole>, DbError>;

    /// System roles first, then by code.
    async fn list_roles(&self) -> Result<Vec<AdminRole>, DbError>;

    async fn create_role(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<AdminRole, DbError>;

    async fn update_role(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<Option<AdminRole>, DbError>;

    /// Deletes the role and its grants. Returns whether the role existed.
    async fn delete_role(&self, code: &str) -> Result<bool, DbError>;

    /// Ordered by group, then code.
    async fn list_permissions(&self) -> Result<Vec<AdminPermission>, DbError>;

    /// How many of `codes` name existing permissions.
    async fn count_permissions(&self, codes: &[String]) -> Result<i64, DbError>;

    /// Replaces the role's grants with `codes` atomically.
    async fn replace_role_permissions(&self, role: &str, codes: &[String]) -> Result<(), DbError>;
}
