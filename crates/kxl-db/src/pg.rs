//! SQLx-backed repositories.

use async_trait::async_trait;
use kxl_models::{
    Admin, AdminChanges, AdminId, AdminPermission, AdminRole, NewAdmin, NewUser,
    PrincipalStatus, User, UserFilter, UserId,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::DbError;
use crate::repository::{PrincipalRepository, RolePermissionRepository};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, status, session_version, created_at, updated_at";
const ADMIN_COLUMNS: &str = "id, username, password_hash, role, status, created_at, updated_at";
const ROLE_COLUMNS: &str = "code, name, description, is_system, created_at, updated_at";

/// Escapes `%`, `_` and `\` so a keyword matches literally inside `ILIKE`.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[derive(Clone)]
pub struct PgPrincipalRepository {
    pool: PgPool,
}

impl PgPrincipalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalRepository for PgPrincipalRepository {
    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_identifier(&self, identifier: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1 LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_exists_by_username(&self, username: &str) -> Result<bool, DbError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool, DbError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    #[instrument(skip(self, user), fields(user.username = %user.username))]
    async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, status, session_version)
            VALUES ($1, $2, $3, $4, 1, 0)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(UserId::new())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_user_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET password_hash = $2,
                session_version = session_version + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn update_user_status(
        &self,
        id: UserId,
        status: PrincipalStatus,
    ) -> Result<Option<User>, DbError> {
        // Unchanged status leaves the row (and its sessions) untouched.
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET session_version = CASE
                    WHEN $2 = 0 THEN session_version + 1
                    ELSE session_version
                END,
                status = $2,
                updated_at = NOW()
            WHERE id = $1 AND status <> $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) => Ok(Some(user)),
            None => self.find_user_by_id(id).await,
        }
    }

    #[instrument(skip(self))]
    async fn list_users(&self, filter: &UserFilter) -> Result<(Vec<User>, i64), DbError> {
        let pattern = filter.keyword.as_deref().map(like_pattern);
        let predicate = r#"
            ($1::text IS NULL OR username ILIKE $1 OR email ILIKE $1)
            AND ($2::smallint IS NULL OR status = $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {predicate}"))
            .bind(pattern.as_deref())
            .bind(filter.status)
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE {predicate}
            ORDER BY created_at DESC, id ASC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(pattern.as_deref())
        .bind(filter.status)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((users, total))
    }

    #[instrument(skip(self))]
    async fn find_admin_by_id(&self, id: AdminId) -> Result<Option<Admin>, DbError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    #[instrument(skip(self))]
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, DbError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn list_admins(&self) -> Result<Vec<Admin>, DbError> {
        let admins = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins ORDER BY created_at DESC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(admins)
    }

    #[instrument(skip(self, admin), fields(admin.username = %admin.username))]
    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, DbError> {
        sqlx::query_as::<_, Admin>(&format!(
            r#"
            INSERT INTO admins (id, username, password_hash, role, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ADMIN_COLUMNS}
            "#
        ))
        .bind(AdminId::new())
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(&admin.role)
        .bind(admin.status)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)
    }

    #[instrument(skip(self, changes))]
    async fn update_admin(
        &self,
        id: AdminId,
        changes: AdminChanges,
    ) -> Result<Option<Admin>, DbError> {
        sqlx::query_as::<_, Admin>(&format!(
            r#"
            UPDATE admins
            SET username = $2, role = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {ADMIN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.role)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from_write)
    }

    #[instrument(skip(self))]
    async fn delete_admin(&self, id: AdminId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_admins_with_role(&self, role: &str) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Clone)]
pub struct PgRolePermissionRepository {
    pool: PgPool,
}

impl PgRolePermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RolePermissionRepository for PgRolePermissionRepository {
    #[instrument(skip(self))]
    async fn list_permission_codes_for_role(&self, role: &str) -> Result<Vec<String>, DbError> {
        let codes: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT permission_code FROM admin_role_permissions
            WHERE role_code = $1
            ORDER BY permission_code ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }

    async fn find_role(&self, code: &str) -> Result<Option<AdminRole>, DbError> {
        let role = sqlx::query_as::<_, AdminRole>(&format!(
            "SELECT {ROLE_COLUMNS} FROM admin_roles WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn list_roles(&self) -> Result<Vec<AdminRole>, DbError> {
        let roles = sqlx::query_as::<_, AdminRole>(&format!(
            "SELECT {ROLE_COLUMNS} FROM admin_roles ORDER BY is_system DESC, code ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    #[instrument(skip(self, name, description))]
    async fn create_role(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<AdminRole, DbError> {
        sqlx::query_as::<_, AdminRole>(&format!(
            r#"
            INSERT INTO admin_roles (code, name, description, is_system)
            VALUES ($1, $2, $3, FALSE)
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)
    }

    #[instrument(skip(self, name, description))]
    async fn update_role(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<Option<AdminRole>, DbError> {
        let role = sqlx::query_as::<_, AdminRole>(&format!(
            r#"
            UPDATE admin_roles
            SET name = $2, description = $3, updated_at = NOW()
            WHERE code = $1
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    #[instrument(skip(self))]
    async fn delete_role(&self, code: &str) -> Result<bool, DbError> {
        // Grants go with the role through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM admin_roles WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_permissions(&self) -> Result<Vec<AdminPermission>, DbError> {
        let permissions = sqlx::query_as::<_, AdminPermission>(
            r#"
            SELECT code, name, group_name, description, is_system
            FROM admin_permissions
            ORDER BY group_name ASC, code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(permissions)
    }

    async fn count_permissions(&self, codes: &[String]) -> Result<i64, DbError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admin_permissions WHERE code = ANY($1)")
                .bind(codes)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn replace_role_permissions(&self, role: &str, codes: &[String]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM admin_role_permissions WHERE role_code = $1")
            .bind(role)
            .execute(&mut *tx)
            .await?;

        if !codes.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO admin_role_permissions (role_code, permission_code)
                SELECT $1, code FROM UNNEST($2::text[]) AS code
                "#,
            )
            .bind(role)
            .bind(codes)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from_write)?;
        }

        tx.commit().await?;
        Ok(())
    }
}
