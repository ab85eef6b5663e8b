//! End-user accounts.
//!
//! `session_version` is the mass-invalidation counter for a user's sessions:
//! a session is only honoured while the version embedded in it equals the
//! stored one. Anything that must log a user out everywhere (password
//! change, being disabled) increments it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::UserId;
use crate::status::PrincipalStatus;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[schema(value_type = i16)]
    pub status: PrincipalStatus,
    pub session_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[schema(value_type = i16)]
    pub status: PrincipalStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            status: user.status,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Insert payload for a new account; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUserDto {
    #[validate(length(
        min = 1,
        max = 64,
        message = "validation error: missing required fields"
    ))]
    pub username: String,
    #[validate(email(message = "validation error: invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub old_password: String,
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserStatusDto {
    #[schema(value_type = i16)]
    pub status: PrincipalStatus,
}

/// Query parameters of the admin user listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// Case-insensitive substring of username or email
    pub keyword: Option<String>,
    /// `0` disabled, `1` active
    pub status: Option<String>,
}

/// Resolved listing filter handed to the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub keyword: Option<String>,
    pub status: Option<PrincipalStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl UserFilterParams {
    /// Blank keywords and unknown statuses are ignored.
    #[must_use]
    pub fn into_filter(self, limit: i64, offset: i64) -> UserFilter {
        UserFilter {
            keyword: self
                .keyword
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            status: self
                .status
                .and_then(|s| s.trim().parse::<i16>().ok())
                .and_then(|s| PrincipalStatus::try_from(s).ok()),
            limit,
            offset,
        }
    }
}
