//! # Cache Backends
//!
//! A uniform key/value store abstraction with three interchangeable
//! implementations:
//!
//! - [`MemoryBackend`]: in-process map with lazy TTL eviction and an optional
//!   LRU bound
//! - [`MemcachedBackend`]: hash-distributed multi-host store, binary protocol
//! - [`RedisBackend`]: single-node typed-protocol store over a connection pool
//!
//! ## Contract
//!
//! Every backend satisfies the same contract: `set` followed by `get` on the
//! same key, with no intervening `delete` or expiry, returns the same bytes
//! (read-your-write within one backend instance). Expiry is relative to the
//! call; `None` means the entry never expires. Bulk operations are not atomic
//! across keys — a partial application surfaces as an `Err`, never silently.
//!
//! Networked backends prepend a fixed per-instance key prefix before storage,
//! isolating independently configured instances that share one physical
//! store. Results are always re-keyed by the logical (unprefixed) key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub mod config;
pub mod entry;
pub mod memcached;
pub mod memory;
pub mod redis;

pub use self::config::{BackendConfig, CacheRegistry};
pub use self::entry::StoredEntry;
pub use self::memcached::MemcachedBackend;
pub use self::memory::{MemoryBackend, MemoryStats};
pub use self::redis::RedisBackend;

/// Shared handle to a cache backend.
pub type SharedBackend = Arc<dyn CacheBackend>;

/// Uniform key/value store contract implemented by every backend variant.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get the stored bytes for a key, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Get stored bytes for a set of keys in one round-trip.
    ///
    /// Absent keys are omitted from the returned map.
    async fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>>;

    /// Store bytes under a key with an optional relative expiry.
    async fn set(&self, key: &str, value: Vec<u8>, expire: Option<Duration>) -> Result<()>;

    /// Store several entries in one round-trip, all with the same expiry.
    async fn set_multi(
        &self,
        entries: HashMap<String, Vec<u8>>,
        expire: Option<Duration>,
    ) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove several keys in one round-trip.
    async fn delete_multi(&self, keys: &[String]) -> Result<()>;
}
