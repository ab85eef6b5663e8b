//! In-process repositories for tests.
//!
//! Both follow the Postgres semantics of their trait (ordering, version
//! bumps, uniqueness) and can be switched into an outage mode so callers'
//! error paths are reachable without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use kxl_models::{
    Admin, AdminChanges, AdminId, AdminPermission, AdminRole, NewAdmin, NewUser,
    PrincipalStatus, User, UserFilter, UserId,
};

use crate::DbError;
use crate::repository::{PrincipalRepository, RolePermissionRepository};

fn unavailable() -> DbError {
    DbError::Unavailable("memory repository switched off".to_string())
}

#[derive(Debug, Default)]
struct Principals {
    users: HashMap<UserId, User>,
    admins: HashMap<AdminId, Admin>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPrincipalRepository {
    state: Arc<Mutex<Principals>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryPrincipalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with `DbError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn insert_user(&self, user: User) {
        self.lock().users.insert(user.id, user);
    }

    pub fn insert_admin(&self, admin: Admin) {
        self.lock().admins.insert(admin.id, admin);
    }

    pub fn remove_user(&self, id: UserId) {
        self.lock().users.remove(&id);
    }

    pub fn remove_admin(&self, id: AdminId) {
        self.lock().admins.remove(&id);
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.lock().users.get(&id).cloned()
    }

    pub fn admin(&self, id: AdminId) -> Option<Admin> {
        self.lock().admins.get(&id).cloned()
    }

    /// Overwrites the stored version without touching anything else.
    pub fn set_user_session_version(&self, id: UserId, version: i32) {
        if let Some(user) = self.lock().users.get_mut(&id) {
            user.session_version = version;
        }
    }

    /// Overwrites the stored status without bumping the session version.
    pub fn set_user_status(&self, id: UserId, status: PrincipalStatus) {
        if let Some(user) = self.lock().users.get_mut(&id) {
            user.status = status;
        }
    }

    pub fn set_admin_status(&self, id: AdminId, status: PrincipalStatus) {
        if let Some(admin) = self.lock().admins.get_mut(&id) {
            admin.status = status;
        }
    }

    fn check(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Principals> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn matches_filter(user: &User, filter: &UserFilter) -> bool {
    let keyword_ok = filter.keyword.as_deref().is_none_or(|k| {
        let k = k.to_lowercase();
        user.username.to_lowercase().contains(&k) || user.email.to_lowercase().contains(&k)
    });
    let status_ok = filter.status.is_none_or(|s| user.status == s);
    keyword_ok && status_ok
}

#[async_trait]
impl PrincipalRepository for MemoryPrincipalRepository {
    async fn ping(&self) -> Result<(), DbError> {
        self.check()
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, DbError> {
        self.check()?;
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_identifier(&self, identifier: &str) -> Result<Option<User>, DbError> {
        self.check()?;
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }

    async fn user_exists_by_username(&self, username: &str) -> Result<bool, DbError> {
        self.check()?;
        Ok(self.lock().users.values().any(|u| u.username == username))
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool, DbError> {
        self.check()?;
        Ok(self.lock().users.values().any(|u| u.email == email))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        self.check()?;
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(DbError::Conflict("users_username_key".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: UserId::new(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            status: PrincipalStatus::Active,
            session_version: 0,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_user_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<Option<User>, DbError> {
        self.check()?;
        let mut state = self.lock();
        Ok(state.users.get_mut(&id).map(|user| {
            user.password_hash = password_hash.to_string();
            user.session_version += 1;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_user_status(
        &self,
        id: UserId,
        status: PrincipalStatus,
    ) -> Result<Option<User>, DbError> {
        self.check()?;
        let mut state = self.lock();
        Ok(state.users.get_mut(&id).map(|user| {
            if user.status != status {
                if status == PrincipalStatus::Disabled {
                    user.session_version += 1;
                }
                user.status = status;
                user.updated_at = Utc::now();
            }
            user.clone()
        }))
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<(Vec<User>, i64), DbError> {
        self.check()?;
        let state = self.lock();
        let mut matched: Vec<User> = state
            .users
            .values()
            .filter(|u| matches_filter(u, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.0.cmp(&b.id.0)));

        let total = matched.len() as i64;
        let offset = usize::try_from(filter.offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit.max(0)).unwrap_or(usize::MAX);
        let page = matched.into_iter().skip(offset).take(limit).collect();
        Ok((page, total))
    }

    async fn find_admin_by_id(&self, id: AdminId) -> Result<Option<Admin>, DbError> {
        self.check()?;
        Ok(self.lock().admins.get(&id).cloned())
    }

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, DbError> {
        self.check()?;
        Ok(self
            .lock()
            .admins
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn list_admins(&self) -> Result<Vec<Admin>, DbError> {
        self.check()?;
        let mut admins: Vec<Admin> = self.lock().admins.values().cloned().collect();
        admins.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.0.cmp(&b.id.0)));
        Ok(admins)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, DbError> {
        self.check()?;
        let mut state = self.lock();
        if state.admins.values().any(|a| a.username == admin.username) {
            return Err(DbError::Conflict("admins_username_key".to_string()));
        }
        let now = Utc::now();
        let created = Admin {
            id: AdminId::new(),
            username: admin.username,
            password_hash: admin.password_hash,
            role: admin.role,
            status: admin.status,
            created_at: now,
            updated_at: now,
        };
        state.admins.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_admin(
        &self,
        id: AdminId,
        changes: AdminChanges,
    ) -> Result<Option<Admin>, DbError> {
        self.check()?;
        let mut state = self.lock();
        if state
            .admins
            .values()
            .any(|a| a.id != id && a.username == changes.username)
        {
            return Err(DbError::Conflict("admins_username_key".to_string()));
        }
        Ok(state.admins.get_mut(&id).map(|admin| {
            admin.username = changes.username;
            admin.role = changes.role;
            admin.status = changes.status;
            admin.updated_at = Utc::now();
            admin.clone()
        }))
    }

    async fn delete_admin(&self, id: AdminId) -> Result<bool, DbError> {
        self.check()?;
        Ok(self.lock().admins.remove(&id).is_some())
    }

    async fn count_admins_with_role(&self, role: &str) -> Result<i64, DbError> {
        self.check()?;
        Ok(self.lock().admins.values().filter(|a| a.role == role).count() as i64)
    }
}

/// `(code, name, group)` of the permissions the initial migration seeds.
const SEED_PERMISSIONS: &[(&str, &str, &str)] = &[
    ("admins:manage", "Manage admins", "accounts"),
    ("users:read", "View users", "accounts"),
    ("users:write", "Edit users", "accounts"),
    ("rbac:manage", "Manage roles", "access"),
    ("articles:read", "View articles", "content"),
    ("articles:write", "Edit articles", "content"),
    ("cases:read", "View cases", "content"),
    ("cases:write", "Edit cases", "content"),
    ("messages:read", "View messages", "content"),
    ("messages:write", "Edit messages", "content"),
    ("projects:read", "View projects", "content"),
    ("projects:write", "Edit projects", "content"),
    ("settings:read", "View settings", "system"),
    ("settings:write", "Edit settings", "system"),
    ("upload:write", "Upload files", "system"),
];

#[derive(Debug, Default)]
struct Roles {
    roles: BTreeMap<String, AdminRole>,
    permissions: BTreeMap<String, AdminPermission>,
    grants: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRolePermissionRepository {
    state: Arc<Mutex<Roles>>,
    lookups: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryRolePermissionRepository {
    /// Empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in `super_admin` and `admin` roles plus the seeded
    /// permission catalogue. `admin` holds everything except admin and
    /// role management, as after the initial migration.
    pub fn seeded() -> Self {
        let repo = Self::new();
        repo.insert_role(system_role("super_admin", "Super administrator"));
        repo.insert_role(system_role("admin", "Administrator"));
        {
            let mut state = repo.lock();
            for (code, name, group) in SEED_PERMISSIONS {
                if !matches!(*code, "admins:manage" | "rbac:manage") {
                    state
                        .grants
                        .entry("admin".to_string())
                        .or_default()
                        .insert((*code).to_string());
                }
                state.permissions.insert(
                    (*code).to_string(),
                    AdminPermission {
                        code: (*code).to_string(),
                        name: (*name).to_string(),
                        group_name: (*group).to_string(),
                        description: String::new(),
                        is_system: true,
                    },
                );
            }
        }
        repo
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn insert_role(&self, role: AdminRole) {
        self.lock().roles.insert(role.code.clone(), role);
    }

    /// Grants `code` to `role` directly, the way an out-of-band SQL edit would.
    pub fn grant(&self, role: &str, code: &str) {
        self.lock()
            .grants
            .entry(role.to_string())
            .or_default()
            .insert(code.to_string());
    }

    pub fn revoke(&self, role: &str, code: &str) {
        if let Some(codes) = self.lock().grants.get_mut(role) {
            codes.remove(code);
        }
    }

    /// Number of `list_permission_codes_for_role` calls that reached this
    /// repository.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Roles> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn system_role(code: &str, name: &str) -> AdminRole {
    let now = Utc::now();
    AdminRole {
        code: code.to_string(),
        name: name.to_string(),
        description: String::new(),
        is_system: true,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl RolePermissionRepository for MemoryRolePermissionRepository {
    async fn list_permission_codes_for_role(&self, role: &str) -> Result<Vec<String>, DbError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .lock()
            .grants
            .get(role)
            .map(|codes| codes.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_role(&self, code: &str) -> Result<Option<AdminRole>, DbError> {
        self.check()?;
        Ok(self.lock().roles.get(code).cloned())
    }

    async fn list_roles(&self) -> Result<Vec<AdminRole>, DbError> {
        self.check()?;
        let mut roles: Vec<AdminRole> = self.lock().roles.values().cloned().collect();
        roles.sort_by(|a, b| b.is_system.cmp(&a.is_system).then(a.code.cmp(&b.code)));
        Ok(roles)
    }

    async fn create_role(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<AdminRole, DbError> {
        self.check()?;
        let mut state = self.lock();
        if state.roles.contains_key(code) {
            return Err(DbError::Conflict("admin_roles_pkey".to_string()));
        }
        let now = Utc::now();
        let role = AdminRole {
            code: code.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            is_system: false,
            created_at: now,
            updated_at: now,
        };
        state.roles.insert(role.code.clone(), role.clone());
        Ok(role)
    }

    async fn update_role(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<Option<AdminRole>, DbError> {
        self.check()?;
        Ok(self.lock().roles.get_mut(code).map(|role| {
            role.name = name.to_string();
            role.description = description.to_string();
            role.updated_at = Utc::now();
            role.clone()
        }))
    }

    async fn delete_role(&self, code: &str) -> Result<bool, DbError> {
        self.check()?;
        let mut state = self.lock();
        state.grants.remove(code);
        Ok(state.roles.remove(code).is_some())
    }

    async fn list_permissions(&self) -> Result<Vec<AdminPermission>, DbError> {
        self.check()?;
        let mut permissions: Vec<AdminPermission> =
            self.lock().permissions.values().cloned().collect();
        permissions.sort_by(|a, b| a.group_name.cmp(&b.group_name).then(a.code.cmp(&b.code)));
        Ok(permissions)
    }

    async fn count_permissions(&self, codes: &[String]) -> Result<i64, DbError> {
        self.check()?;
        let state = self.lock();
        let distinct: BTreeSet<&String> = codes.iter().collect();
        Ok(distinct
            .into_iter()
            .filter(|c| state.permissions.contains_key(*c))
            .count() as i64)
    }

    async fn replace_role_permissions(&self, role: &str, codes: &[String]) -> Result<(), DbError> {
        self.check()?;
        self.lock()
            .grants
            .insert(role.to_string(), codes.iter().cloned().collect());
        Ok(())
    }
}
