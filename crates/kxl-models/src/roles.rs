use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct AdminRole {
    pub code: String,
    pub name: String,
    pub description: String,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct AdminPermission {
    pub code: String,
    pub name: String,
    pub group_name: String,
    pub description: String,
    pub is_system: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[validate(length(min = 1, max = 64, message = "validation error: missing required fields"))]
    pub code: String,
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleDto {
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SetRolePermissionsDto {
    #[serde(default)]
    pub permission_codes: Vec<String>,
}

impl SetRolePermissionsDto {
    /// Trimmed, deduplicated, sorted codes.
    #[must_use]
    pub fn normalized_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .permission_codes
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }
}
