//! Admin accounts.
//!
//! Admins carry a role code; their permission set is resolved from the role
//! on every authenticated request. There is no per-admin session counter, so
//! an admin is cut off by deleting its sessions or disabling it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::AdminId;
use crate::status::PrincipalStatus;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    #[schema(value_type = i16)]
    pub status: PrincipalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminProfile {
    pub id: AdminId,
    pub username: String,
    pub role: String,
    #[schema(value_type = i16)]
    pub status: PrincipalStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            role: admin.role.clone(),
            status: admin.status,
            created_at: admin.created_at,
        }
    }
}

/// Admin profile with the permission codes of its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminWithPermissions {
    #[serde(flatten)]
    pub profile: AdminProfile,
    pub permissions: Vec<String>,
}

/// Insert payload for a new admin; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub status: PrincipalStatus,
}

/// Full replacement of an admin's mutable fields.
#[derive(Debug, Clone)]
pub struct AdminChanges {
    pub username: String,
    pub role: String,
    pub status: PrincipalStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdminDto {
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub username: String,
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub password: String,
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub role: String,
    #[schema(value_type = Option<i16>)]
    pub status: Option<PrincipalStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAdminDto {
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub username: String,
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub role: String,
    #[schema(value_type = Option<i16>)]
    pub status: Option<PrincipalStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_flatten_into_profile() {
        let admin = Admin {
            id: AdminId::new(),
            username: "root".to_string(),
            password_hash: "x".to_string(),
            role: "super_admin".to_string(),
            status: PrincipalStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let view = AdminWithPermissions {
            profile: AdminProfile::from(&admin),
            permissions: vec!["*".to_string()],
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["username"], "root");
        assert_eq!(json["permissions"][0], "*");
        assert!(json.get("password_hash").is_none());
    }
}
