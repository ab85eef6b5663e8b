use std::time::Duration;

use async_trait::async_trait;

/// Error type for key-value operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The handful of single-key operations the services rely on. Each one is
/// atomic on the backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes `key`. Deleting a missing key succeeds.
    async fn del(&self, key: &str) -> Result<(), CacheError>;

    /// Increments the counter at `key` and returns the new value. When the
    /// new value is `1` the key gets an expiry of `window`; later increments
    /// leave the expiry alone.
    async fn incr_with_expiry(&self, key: &str, window: Duration) -> Result<u64, CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}
