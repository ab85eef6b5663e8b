//! Abuse protection and authorization cache settings.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_LOGIN_WINDOW_SECONDS`: Login window length (default: 60)
//! - `RATE_LIMIT_LOGIN_MAX_ATTEMPTS`: Login attempts per window (default: 20)
//! - `RATE_LIMIT_UPLOAD_WINDOW_SECONDS`: Upload window length (default: 60)
//! - `RATE_LIMIT_UPLOAD_MAX_REQUESTS`: Uploads per window (default: 30)
//! - `RBAC_CACHE_TTL_SECONDS`: Role permission cache TTL (default: 300)
//! - `PASSWORD_HASH_COST`: bcrypt cost for new hashes (default: 12)

use crate::env::{self, Vars};

/// A fixed-window limit: at most `max_requests` per `window_seconds`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitPolicyConfig {
    pub window_seconds: u64,
    pub max_requests: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityConfig {
    pub login_rate_limit: RateLimitPolicyConfig,
    pub upload_rate_limit: RateLimitPolicyConfig,
    pub rbac_cache_ttl_seconds: u64,
    pub password_hash_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            login_rate_limit: RateLimitPolicyConfig {
                window_seconds: 60,
                max_requests: 20,
            },
            upload_rate_limit: RateLimitPolicyConfig {
                window_seconds: 60,
                max_requests: 30,
            },
            rbac_cache_ttl_seconds: 300,
            password_hash_cost: 12,
        }
    }
}

impl SecurityConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&env::process_vars)
    }

    pub(crate) fn from_vars(vars: Vars<'_>) -> Self {
        let defaults = Self::default();
        Self {
            login_rate_limit: RateLimitPolicyConfig {
                window_seconds: env::positive_or(
                    vars,
                    "RATE_LIMIT_LOGIN_WINDOW_SECONDS",
                    defaults.login_rate_limit.window_seconds,
                ),
                max_requests: env::positive_or(
                    vars,
                    "RATE_LIMIT_LOGIN_MAX_ATTEMPTS",
                    defaults.login_rate_limit.max_requests,
                ),
            },
            upload_rate_limit: RateLimitPolicyConfig {
                window_seconds: env::positive_or(
                    vars,
                    "RATE_LIMIT_UPLOAD_WINDOW_SECONDS",
                    defaults.upload_rate_limit.window_seconds,
                ),
                max_requests: env::positive_or(
                    vars,
                    "RATE_LIMIT_UPLOAD_MAX_REQUESTS",
                    defaults.upload_rate_limit.max_requests,
                ),
            },
            rbac_cache_ttl_seconds: env::positive_or(
                vars,
                "RBAC_CACHE_TTL_SECONDS",
                defaults.rbac_cache_ttl_seconds,
            ),
            password_hash_cost: env::parse::<u32>(vars, "PASSWORD_HASH_COST")
                .filter(|cost| (4..=31).contains(cost))
                .unwrap_or(defaults.password_hash_cost),
        }
    }
}
