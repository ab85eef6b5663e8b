//! Fixed-window rate limiting.
//!
//! Each check is one atomic increment-with-first-expiry on the key-value
//! store. A counter only resets when its key expires. When the store itself
//! fails the request is allowed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kxl_cache::KeyValueStore;
use kxl_cache::keys::rate_limit;
use kxl_config::{RateLimitPolicyConfig, SecurityConfig};
use tracing::{debug, warn};

/// Which principal namespace a limited request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    User,
    Admin,
}

impl ActorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_requests: u64,
}

impl From<RateLimitPolicyConfig> for RateLimitPolicy {
    fn from(config: RateLimitPolicyConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_seconds),
            max_requests: config.max_requests,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allow,
    Deny,
}

impl RateLimitDecision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    login: RateLimitPolicy,
    upload: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, login: RateLimitPolicy, upload: RateLimitPolicy) -> Self {
        Self {
            store,
            login,
            upload,
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &SecurityConfig) -> Self {
        Self::new(
            store,
            config.login_rate_limit.into(),
            config.upload_rate_limit.into(),
        )
    }

    #[must_use]
    pub fn login_policy(&self) -> RateLimitPolicy {
        self.login
    }

    #[must_use]
    pub fn upload_policy(&self) -> RateLimitPolicy {
        self.upload
    }

    /// Counts one request against `key` and denies once the count exceeds
    /// `max_requests`. A zero window or limit disables the check.
    pub async fn check_and_increment(
        &self,
        key: &str,
        window: Duration,
        max_requests: u64,
    ) -> RateLimitDecision {
        if window.is_zero() || max_requests == 0 {
            return RateLimitDecision::Allow;
        }

        match self.store.incr_with_expiry(key, window).await {
            Ok(count) if count > max_requests => {
                debug!(rate_limit.key = %key, rate_limit.count = count, "Rate limit exceeded");
                RateLimitDecision::Deny
            }
            Ok(_) => RateLimitDecision::Allow,
            Err(err) => {
                warn!(rate_limit.key = %key, error = %err, "Rate limit backend error, allowing request");
                RateLimitDecision::Allow
            }
        }
    }

    /// Login attempts per `(actor, client ip, identifier)`.
    pub async fn check_login(
        &self,
        actor: ActorKind,
        client_ip: &str,
        identifier: &str,
    ) -> RateLimitDecision {
        let key = rate_limit::login(actor.as_str(), client_ip, identifier);
        self.check_and_increment(&key, self.login.window, self.login.max_requests)
            .await
    }

    /// Uploads per `(actor, subject, kind)`; `subject` is the principal id
    /// or, for anonymous callers, the client ip.
    pub async fn check_upload(
        &self,
        actor: ActorKind,
        subject: &str,
        kind: &str,
    ) -> RateLimitDecision {
        let key = rate_limit::upload(actor.as_str(), subject, kind);
        self.check_and_increment(&key, self.upload.window, self.upload.max_requests)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kxl_cache::MemoryStore;

    const MINUTE: Duration = Duration::from_secs(60);

    fn limiter(max: u64) -> (MemoryStore, RateLimiter) {
        let store = MemoryStore::new();
        let policy = RateLimitPolicy {
            window: MINUTE,
            max_requests: max,
        };
        let limiter = RateLimiter::new(Arc::new(store.clone()), policy, policy);
        (store, limiter)
    }

    #[tokio::test]
    async fn test_window_allows_then_denies_then_resets() {
        let (store, limiter) = limiter(3);
        let mut decisions = Vec::new();
        for _ in 0..4 {
            decisions.push(limiter.check_and_increment("k", MINUTE, 3).await);
        }
        assert_eq!(
            decisions,
            vec![
                RateLimitDecision::Allow,
                RateLimitDecision::Allow,
                RateLimitDecision::Allow,
                RateLimitDecision::Deny,
            ]
        );

        store.expire("k");
        assert!(limiter.check_and_increment("k", MINUTE, 3).await.is_allowed());
    }

    #[tokio::test]
    async fn test_first_hit_sets_window_expiry() {
        let (store, limiter) = limiter(3);
        limiter.check_and_increment("k", MINUTE, 3).await;
        let ttl = store.ttl("k").unwrap();
        assert!(ttl <= MINUTE && ttl > Duration::from_secs(55));
    }

    #[tokio::test]
    async fn test_backend_error_fails_open() {
        let (store, limiter) = limiter(1);
        store.set_unavailable(true);
        for _ in 0..5 {
            assert!(limiter.check_and_increment("k", MINUTE, 1).await.is_allowed());
        }
    }

    #[tokio::test]
    async fn test_zero_limit_disables_check() {
        let (store, limiter) = limiter(1);
        assert!(limiter.check_and_increment("k", MINUTE, 0).await.is_allowed());
        assert!(limiter.check_and_increment("k", Duration::ZERO, 1).await.is_allowed());
        assert!(!store.contains("k"));
    }

    #[tokio::test]
    async fn test_login_keys_are_per_identifier() {
        let (store, limiter) = limiter(1);
        assert!(limiter.check_login(ActorKind::User, "10.0.0.1", "a").await.is_allowed());
        assert!(!limiter.check_login(ActorKind::User, "10.0.0.1", "a").await.is_allowed());
        assert!(limiter.check_login(ActorKind::User, "10.0.0.1", "b").await.is_allowed());
        assert!(limiter.check_login(ActorKind::Admin, "10.0.0.1", "a").await.is_allowed());
        assert!(store.contains("rl:login:user:10.0.0.1:YQ"));
    }

    #[tokio::test]
    async fn test_upload_keys() {
        let (store, limiter) = limiter(2);
        limiter.check_upload(ActorKind::Admin, "42", "image").await;
        assert!(store.contains("rl:upload:admin:42:image"));
    }
}
