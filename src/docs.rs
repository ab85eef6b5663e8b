use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::modules::rbac::model::RolePermissions;
use kxl_models::{
    AdminPermission, AdminProfile, AdminRole, AdminWithPermissions, ChangePasswordDto,
    CreateAdminDto, CreateRoleDto, LoginRequest, RegisterUserDto, SetRolePermissionsDto,
    UpdateAdminDto, UpdateRoleDto, UpdateUserStatusDto, UserProfile,
};

/// Error envelope returned by every failing endpoint.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ErrorResponse {
    /// Business code, e.g. `40101`
    pub code: i32,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health,
        crate::modules::health::controller::ready,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::change_password,
        crate::modules::admin_auth::controller::login_admin,
        crate::modules::admin_auth::controller::logout_admin,
        crate::modules::admin_auth::controller::me,
        crate::modules::admin_users::controller::list_users,
        crate::modules::admin_users::controller::get_user,
        crate::modules::admin_users::controller::update_user_status,
        crate::modules::admins::controller::list_admins,
        crate::modules::admins::controller::create_admin,
        crate::modules::admins::controller::update_admin,
        crate::modules::admins::controller::delete_admin,
        crate::modules::rbac::controller::list_roles,
        crate::modules::rbac::controller::create_role,
        crate::modules::rbac::controller::update_role,
        crate::modules::rbac::controller::delete_role,
        crate::modules::rbac::controller::list_permissions,
        crate::modules::rbac::controller::get_role_permissions,
        crate::modules::rbac::controller::set_role_permissions,
    ),
    components(
        schemas(
            ErrorResponse,
            LoginRequest,
            RegisterUserDto,
            ChangePasswordDto,
            UserProfile,
            UpdateUserStatusDto,
            AdminProfile,
            AdminWithPermissions,
            CreateAdminDto,
            UpdateAdminDto,
            AdminRole,
            AdminPermission,
            CreateRoleDto,
            UpdateRoleDto,
            SetRolePermissionsDto,
            RolePermissions,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Authentication", description = "End-user registration and sessions"),
        (name = "Users", description = "End-user account self-service"),
        (name = "Admin Authentication", description = "Admin sessions"),
        (name = "Admin Users", description = "End-user management"),
        (name = "Admins", description = "Admin account management"),
        (name = "RBAC", description = "Roles and permissions")
    ),
    info(
        title = "KXL API",
        version = "0.1.0",
        description = "Content-management backend with cookie sessions, role-based admin access and login rate limiting.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("kxl_user_session"))),
            );
            components.add_security_scheme(
                "admin_session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("kxl_admin_session"))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/login",
            "/api/admin/auth/login",
            "/api/admin/rbac/roles/{code}/permissions",
            "/ready",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_cookie_security_schemes() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("user_session"));
        assert!(components.security_schemes.contains_key("admin_session"));
    }
}
