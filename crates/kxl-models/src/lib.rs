//! # KXL Models
//!
//! Durable entities and request/response DTOs.
//!
//! - [`ids`]: Typed principal ids
//! - [`status`]: Principal account status
//! - [`users`]: End-user accounts
//! - [`admins`]: Admin accounts
//! - [`roles`]: Admin roles and permissions
//! - [`auth`]: Login payloads shared by both principal kinds

pub mod admins;
pub mod auth;
pub mod ids;
pub mod roles;
pub mod status;
pub mod users;

pub use admins::{
    Admin, AdminChanges, AdminProfile, AdminWithPermissions, CreateAdminDto, NewAdmin,
    UpdateAdminDto,
};
pub use auth::LoginRequest;
pub use ids::{AdminId, UserId};
pub use roles::{AdminPermission, AdminRole, CreateRoleDto, SetRolePermissionsDto, UpdateRoleDto};
pub use status::PrincipalStatus;
pub use users::{
    ChangePasswordDto, NewUser, RegisterUserDto, UpdateUserStatusDto, User, UserFilter,
    UserFilterParams, UserProfile,
};
