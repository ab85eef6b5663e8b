use serde::Serialize;
use utoipa::ToSchema;

/// Permission set of one role, sorted by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RolePermissions {
    pub role: String,
    pub permission_codes: Vec<String>,
}
