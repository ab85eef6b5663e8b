//! # KXL DB
//!
//! Postgres pool and the repositories every other layer reads principals
//! and role permissions through.
//!
//! - [`repository`]: [`PrincipalRepository`] and [`RolePermissionRepository`]
//! - [`pg`]: SQLx implementations
//! - `memory`: In-process implementations for tests (`test-utils` feature)
//!
//! # Example
//!
//! ```ignore
//! use kxl_db::{PgPrincipalRepository, init_db_pool};
//!
//! let pool = init_db_pool(&config.database).await?;
//! kxl_db::MIGRATOR.run(&pool).await?;
//! let principals = PgPrincipalRepository::new(pool.clone());
//! ```

use std::time::Duration;

use kxl_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod pg;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{MemoryPrincipalRepository, MemoryRolePermissionRepository};
pub use pg::{PgPrincipalRepository, PgRolePermissionRepository};
pub use repository::{PrincipalRepository, RolePermissionRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Schema migrations under `migrations/` at the workspace root.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            _ => Self::Sqlx(err),
        }
    }
}

/// Connects a PostgreSQL pool using [`DatabaseConfig`].
///
/// # Errors
///
/// Returns `DbError::Sqlx` if the first connection cannot be established.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.connection_url())
        .await?;

    info!(
        db.max_connections = config.max_connections,
        "Database pool ready"
    );
    Ok(pool)
}
