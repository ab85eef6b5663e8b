use std::time::Duration;

use crate::env::{self, Vars};

/// Session cookie and storage settings for both principal kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub user_cookie_name: String,
    pub admin_cookie_name: String,
    pub cookie_secure: bool,
    /// Prefix shared by every session key.
    pub prefix: String,
    pub user_ttl_seconds: u64,
    pub admin_ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_cookie_name: "kxl_user_session".to_string(),
            admin_cookie_name: "kxl_admin_session".to_string(),
            cookie_secure: false,
            prefix: "kxl_session:".to_string(),
            user_ttl_seconds: 7 * 24 * 60 * 60,
            admin_ttl_seconds: 2 * 60 * 60,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Self {
        let defaults = Self::default();
        Self {
            user_cookie_name: env::string_or(
                vars,
                "SESSION_USER_COOKIE_NAME",
                &defaults.user_cookie_name,
            ),
            admin_cookie_name: env::string_or(
                vars,
                "SESSION_ADMIN_COOKIE_NAME",
                &defaults.admin_cookie_name,
            ),
            cookie_secure: env::flag_or(vars, "SESSION_COOKIE_SECURE", defaults.cookie_secure),
            prefix: env::string_or(vars, "SESSION_PREFIX", &defaults.prefix),
            user_ttl_seconds: env::positive_or(
                vars,
                "SESSION_USER_TTL_SECONDS",
                defaults.user_ttl_seconds,
            ),
            admin_ttl_seconds: env::positive_or(
                vars,
                "SESSION_ADMIN_TTL_SECONDS",
                defaults.admin_ttl_seconds,
            ),
        }
    }

    #[must_use]
    pub fn user_ttl(&self) -> Duration {
        Duration::from_secs(self.user_ttl_seconds)
    }

    #[must_use]
    pub fn admin_ttl(&self) -> Duration {
        Duration::from_secs(self.admin_ttl_seconds)
    }
}
