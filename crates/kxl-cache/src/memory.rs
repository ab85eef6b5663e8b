//! In-process [`KeyValueStore`] for tests.
//!
//! Honours TTLs against a monotonic clock and can simulate an outage, so
//! fail-open and fail-closed paths are testable without a Redis server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::store::{CacheError, KeyValueStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with `CacheError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Drops `key` as if its TTL had elapsed.
    pub fn expire(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Remaining time to live of a live key.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.lock().get(key).is_some_and(|e| e.is_live(now))
    }

    /// Live keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .lock()
            .iter()
            .filter(|(k, e)| k.starts_with(prefix) && e.is_live(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Writes `value` without an expiry, bypassing the outage switch.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_available()?;
        let now = Instant::now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.check_available()?;
        self.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.check_available()?;
        self.lock().remove(key);
        Ok(())
    }

    async fn incr_with_expiry(&self, key: &str, window: Duration) -> Result<u64, CacheError> {
        self.check_available()?;
        let now = Instant::now();
        let mut entries = self.lock();

        let current = entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| {
                e.value
                    .parse::<u64>()
                    .map(|n| (n, e.expires_at))
                    .map_err(|_| CacheError::Unavailable(format!("value at {key} is not an integer")))
            })
            .transpose()?;

        let (count, expires_at) = match current {
            Some((n, expires_at)) => (n + 1, expires_at),
            None => (1, Some(now + window)),
        };
        entries.insert(
            key.to_string(),
            Entry {
                value: count.to_string(),
                expires_at,
            },
        );
        Ok(count)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check_available()
    }
}
