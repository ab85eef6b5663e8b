//! # KXL Config
//!
//! Configuration loaded from environment variables.
//!
//! - [`app`]: Environment name and debug flag
//! - [`server`]: Listen address and request deadline
//! - [`database`]: Postgres connection settings
//! - [`redis`]: Redis connection settings
//! - [`session`]: Session cookies, key prefix and TTLs
//! - [`security`]: Rate-limit policies, RBAC cache TTL and password cost
//! - [`cors`]: Allowed origins
//!
//! Every section has a `Default` and a `from_env()`. Empty, unparsable or
//! non-positive numeric values fall back to the section default.
//!
//! # Example
//!
//! ```ignore
//! use kxl_config::Config;
//!
//! dotenvy::dotenv().ok();
//! let config = Config::from_env()?;
//! println!("listening on {}", config.server.address());
//! ```

pub mod app;
pub mod cors;
pub mod database;
mod env;
pub mod redis;
pub mod security;
pub mod server;
pub mod session;

pub use app::AppConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use redis::RedisConfig;
pub use security::{RateLimitPolicyConfig, SecurityConfig};
pub use server::ServerConfig;
pub use session::SessionConfig;

use env::Vars;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
    pub cors: CorsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppConfig::from_vars(vars),
            server: ServerConfig::from_vars(vars)?,
            database: DatabaseConfig::from_vars(vars),
            redis: RedisConfig::from_vars(vars),
            session: SessionConfig::from_vars(vars),
            security: SecurityConfig::from_vars(vars),
            cors: CorsConfig::from_vars(vars),
        })
    }
}
