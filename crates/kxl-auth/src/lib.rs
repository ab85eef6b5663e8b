//! # KXL Auth
//!
//! Session-based authentication and authorization for the KXL API.
//!
//! - [`session`]: Opaque-token user and admin sessions in the key-value store
//! - [`authenticator`]: Token to principal resolution with lazy session cleanup
//! - [`rbac`]: Role permission resolution behind a TTL-bounded cache
//! - [`rate_limit`]: Fixed-window login and upload limits
//!
//! # Principal Kinds
//!
//! Users and admins never share a session namespace, cookie or TTL:
//!
//! - **User sessions** carry the user's `session_version`; bumping it in the
//!   database logs the user out everywhere.
//! - **Admin sessions** carry only the admin id; the admin's role
//!   permissions are resolved on every request.
//!
//! # Example
//!
//! ```ignore
//! use kxl_auth::{Authenticator, RbacService, SessionStore};
//!
//! let sessions = SessionStore::new(store.clone(), &config.session);
//! let token = sessions.create_user_session(user.id, user.session_version).await?;
//!
//! let current = authenticator.authenticate_user(Some(&token)).await?;
//! assert_eq!(current.id, user.id);
//! ```

pub mod authenticator;
pub mod rate_limit;
pub mod rbac;
pub mod session;

pub use authenticator::{Authenticator, CurrentAdmin, CurrentUser};
pub use rate_limit::{ActorKind, RateLimitDecision, RateLimitPolicy, RateLimiter};
pub use rbac::{RbacService, has_permission, require_permission};
pub use session::{AdminSession, SessionStore, UserSession, generate_token};
