//! Request middleware and extractors.
//!
//! - [`auth`]: Session gates (`require_user`, `require_admin`), principal
//!   extractors and permission extractors
//! - [`rate_limit`]: Fixed-window limits on login and upload routes
//! - [`error_detail`]: Internal error causes in responses outside production
//! - [`timeout`]: Per-request deadline rendered as a `40801` envelope
//!
//! # Request Flow
//!
//! 1. Deadline, then CORS
//! 2. Rate limit (login and upload routes only)
//! 3. Session gate for the route group
//! 4. Permission extractor on the handler, if any
//! 5. Handler
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireUsersRead};
//!
//! // Any signed-in user
//! async fn me(AuthUser(current): AuthUser) -> ApiResponse<UserProfile> {
//!     ApiResponse::success(UserProfile::from(&current.user))
//! }
//!
//! // Admins holding users:read
//! async fn list(RequireUsersRead(admin): RequireUsersRead) -> impl IntoResponse {
//!     // ...
//! }
//! ```

pub mod auth;
pub mod error_detail;
pub mod rate_limit;
pub mod timeout;
