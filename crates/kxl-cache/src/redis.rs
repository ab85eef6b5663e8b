//! Redis-backed [`KeyValueStore`].

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::{debug, instrument};

use crate::store::{CacheError, KeyValueStore};

/// INCR, then attach the window expiry only when this increment opened it.
const INCR_WITH_EXPIRY: &str = r#"
local current = redis.call("INCR", KEYS[1])
if tonumber(current) == 1 then
    redis.call("EXPIRE", KEYS[1], ARGV[1])
end
return current
"#;

/// Redis client over a multiplexed, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    incr_script: Script,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Opens a connection to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Redis` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            incr_script: Script::new(INCR_WITH_EXPIRY),
        })
    }

    /// Opens a connection and verifies it with `PING` within `timeout`.
    pub async fn connect(redis_url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let connecting = async {
            let cache = Self::new(redis_url).await?;
            cache.ping().await?;
            Ok::<_, CacheError>(cache)
        };

        tokio::time::timeout(timeout, connecting)
            .await
            .map_err(|_| CacheError::Unavailable("timed out connecting to Redis".to_string()))?
    }
}

#[async_trait]
impl KeyValueStore for RedisCache {
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(cache.hit = value.is_some(), "Cache read");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero TTL.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        debug!(cache.ttl_secs = seconds, "Cache set");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "INCR_EXPIRE"))]
    async fn incr_with_expiry(&self, key: &str, window: Duration) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        let count: i64 = self
            .incr_script
            .key(key)
            .arg(window.as_secs().max(1))
            .invoke_async(&mut conn)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect() -> RedisCache {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        RedisCache::connect(&url, Duration::from_secs(2)).await.unwrap()
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_set_get_del() {
        let cache = connect().await;
        let key = "kxl:test:set_get_del";

        cache.set_ex(key, "value", Duration::from_secs(30)).await.unwrap();
        assert_eq!(cache.get(key).await.unwrap().as_deref(), Some("value"));

        cache.del(key).await.unwrap();
        cache.del(key).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_incr_sets_expiry_once() {
        let cache = connect().await;
        let key = "kxl:test:incr_with_expiry";
        cache.del(key).await.unwrap();

        assert_eq!(cache.incr_with_expiry(key, Duration::from_secs(60)).await.unwrap(), 1);
        assert_eq!(cache.incr_with_expiry(key, Duration::from_secs(5)).await.unwrap(), 2);

        let mut conn = cache.conn.clone();
        let ttl: i64 = conn.ttl(key).await.unwrap();
        assert!(ttl > 5 && ttl <= 60);

        cache.del(key).await.unwrap();
    }
}
