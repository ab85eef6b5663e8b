//! # KXL Cache
//!
//! Access to the shared key-value store that holds every piece of
//! cross-request mutable state: sessions, the role permission cache and
//! rate-limit counters.
//!
//! - [`store`]: The [`KeyValueStore`] trait the services are written against
//! - [`redis`]: Redis implementation over a multiplexed `ConnectionManager`
//! - [`keys`]: Key layouts
//! - `memory`: In-process implementation for tests (`test-utils` feature)
//!
//! # Example
//!
//! ```ignore
//! use std::{sync::Arc, time::Duration};
//! use kxl_cache::{KeyValueStore, RedisCache};
//!
//! let store: Arc<dyn KeyValueStore> = Arc::new(RedisCache::connect("redis://127.0.0.1/").await?);
//! store.set_ex("greeting", "hello", Duration::from_secs(60)).await?;
//! ```

pub mod keys;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod redis;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;
pub use self::redis::RedisCache;
pub use store::{CacheError, KeyValueStore};
