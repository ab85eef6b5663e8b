//! # KXL API
//!
//! Backend for a corporate marketing site: end-user accounts, an admin panel
//! guarded by role-based permissions, and the session, cache and rate-limit
//! plumbing both sides share.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Session gates, permission extractors, rate limiting
//! ├── modules/          # Feature modules
//! │   ├── health/       # Liveness and readiness
//! │   ├── auth/         # End-user register/login/logout/me
//! │   ├── users/        # End-user password change
//! │   ├── admin_auth/   # Admin login/logout/me
//! │   ├── admin_users/  # End-user management
//! │   ├── admins/       # Admin account management
//! │   └── rbac/         # Roles and permission sets
//! └── utils/            # Cookies, client IP, error mapping
//! ```
//!
//! ## Sessions
//!
//! Both principal kinds log in to an opaque random token stored in Redis and
//! handed out as an `HttpOnly` cookie:
//!
//! | Kind | Cookie | Default TTL | Invalidated by |
//! |------|--------|-------------|----------------|
//! | User | `kxl_user_session` | 7 days | logout, password change, disabling (via `session_version`) |
//! | Admin | `kxl_admin_session` | 2 hours | logout, disabling, deletion |
//!
//! Every protected request re-reads the principal from Postgres, so status
//! changes take effect on the next request.
//!
//! ## Permissions
//!
//! Admin permissions come from the admin's role and are cached in Redis per
//! role. `super_admin` always holds `*`. Changing a role's permission set
//! drops its cache entry before the change is acknowledged.
//!
//! ## Rate limiting
//!
//! Login and upload routes are limited with fixed-window counters in Redis.
//! A Redis outage lets requests through.
//!
//! ## API Documentation
//!
//! - Swagger UI: `/swagger-ui`
//! - Scalar: `/scalar`

pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use kxl_auth;
pub use kxl_cache;
pub use kxl_config;
pub use kxl_core;
pub use kxl_db;
pub use kxl_models;
