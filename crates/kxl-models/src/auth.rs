use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Credentials for both user and admin login. Users may log in with their
/// username or email; admins with their username.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "validation error: missing required fields"))]
    pub password: String,
}
