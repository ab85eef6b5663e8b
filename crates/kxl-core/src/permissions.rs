//! Admin permission codes.
//!
//! Permission codes are opaque strings compared by exact match. The only
//! special value is [`WILDCARD`], which grants everything.
//!
//! # Example
//!
//! ```ignore
//! use kxl_core::permissions;
//!
//! rbac::require_permission(&admin.role, &admin.permissions, permissions::USERS_WRITE)?;
//! ```

/// Role that always holds every permission. Never cached, never queried.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// Built-in role that cannot be deleted.
pub const ADMIN_ROLE: &str = "admin";

/// Sentinel permission granting every code.
pub const WILDCARD: &str = "*";

// =============================================================================
// Accounts
// =============================================================================

/// Read end-user accounts
pub const USERS_READ: &str = "users:read";
/// Change end-user account status
pub const USERS_WRITE: &str = "users:write";
/// Manage admin accounts
pub const ADMINS_MANAGE: &str = "admins:manage";

// =============================================================================
// Access control
// =============================================================================

/// Manage roles and role permission sets
pub const RBAC_MANAGE: &str = "rbac:manage";

// =============================================================================
// Content
// =============================================================================

pub const ARTICLES_READ: &str = "articles:read";
pub const ARTICLES_WRITE: &str = "articles:write";
pub const PROJECTS_READ: &str = "projects:read";
pub const PROJECTS_WRITE: &str = "projects:write";
pub const CASES_READ: &str = "cases:read";
pub const CASES_WRITE: &str = "cases:write";
pub const MESSAGES_READ: &str = "messages:read";
pub const MESSAGES_WRITE: &str = "messages:write";
pub const SETTINGS_READ: &str = "settings:read";
pub const SETTINGS_WRITE: &str = "settings:write";
pub const UPLOAD_WRITE: &str = "upload:write";
