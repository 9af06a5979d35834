//! In-process backend with lazy TTL eviction and an optional LRU bound
//!
//! This implementation provides:
//! - Thread-safe async access via RwLock
//! - Per-entry TTL with lazy expiration on read
//! - Optional LRU eviction when an entry bound is configured
//! - Hit/miss/eviction counters

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::backend::entry::StoredEntry;
use crate::backend::CacheBackend;
use crate::error::Result;

/// In-process key/value backend.
///
/// Values are owned by a single map behind a `tokio::sync::RwLock`, so the
/// backend can be shared freely across tasks. Reads take the write lock
/// because an expired entry is removed by the read that observes it.
pub struct MemoryBackend {
    store: RwLock<Store>,

    /// Entry bound for LRU eviction; `None` means unbounded
    max_entries: Option<usize>,
}

/// Internal storage
struct Store {
    entries: HashMap<String, StoredEntry>,

    /// LRU tracking: front is the least recently used key
    lru_queue: VecDeque<String>,

    stats: MemoryStats,
}

/// Counters for the in-process backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    /// Total number of cache hits
    pub hits: u64,

    /// Total number of cache misses
    pub misses: u64,

    /// Number of entries removed by TTL expiry
    pub evictions_ttl: u64,

    /// Number of entries removed by the LRU bound
    pub evictions_lru: u64,
}

impl MemoryBackend {
    /// Create an unbounded in-process backend.
    pub fn new() -> Self {
        Self::with_max_entries(None)
    }

    /// Create a backend that evicts least-recently-used entries beyond a bound.
    pub fn with_max_entries(max_entries: Option<usize>) -> Self {
        Self {
            store: RwLock::new(Store {
                entries: HashMap::new(),
                lru_queue: VecDeque::new(),
                stats: MemoryStats::default(),
            }),
            max_entries,
        }
    }

    /// Get a snapshot of the backend's counters.
    pub async fn stats(&self) -> MemoryStats {
        let store = self.store.read().await;
        store.stats.clone()
    }

    /// Number of live entries (expired entries still count until a read
    /// evicts them).
    pub async fn len(&self) -> usize {
        let store = self.store.read().await;
        store.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn get_locked(&self, store: &mut Store, key: &str) -> Option<Vec<u8>> {
        let expired = match store.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                store.stats.misses += 1;
                return None;
            }
        };

        if expired {
            debug!(key = %key, "entry expired");
            store.entries.remove(key);
            store.lru_queue.retain(|k| k != key);
            store.stats.misses += 1;
            store.stats.evictions_ttl += 1;
            return None;
        }

        store.stats.hits += 1;
        if self.max_entries.is_some() {
            store.lru_queue.retain(|k| k != key);
            store.lru_queue.push_back(key.to_string());
        }

        store.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set_locked(&self, store: &mut Store, key: String, entry: StoredEntry) {
        if let Some(max) = self.max_entries {
            while !store.entries.contains_key(&key) && store.entries.len() >= max {
                match store.lru_queue.pop_front() {
                    Some(evicted) => {
                        debug!(key = %evicted, "evicting least recently used entry");
                        store.entries.remove(&evicted);
                        store.stats.evictions_lru += 1;
                    }
                    None => break,
                }
            }
            store.lru_queue.retain(|k| k != &key);
            store.lru_queue.push_back(key.clone());
        }

        store.entries.insert(key, entry);
    }

    fn delete_locked(&self, store: &mut Store, key: &str) {
        store.entries.remove(key);
        store.lru_queue.retain(|k| k != key);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;
        Ok(self.get_locked(&mut store, key))
    }

    async fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        let mut store = self.store.write().await;
        let mut result = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get_locked(&mut store, key) {
                result.insert(key.clone(), value);
            }
        }
        Ok(result)
    }

    async fn set(&self, key: &str, value: Vec<u8>, expire: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        self.set_locked(&mut store, key.to_string(), StoredEntry::new(value, expire));
        Ok(())
    }

    async fn set_multi(
        &self,
        entries: HashMap<String, Vec<u8>>,
        expire: Option<Duration>,
    ) -> Result<()> {
        let mut store = self.store.write().await;
        for (key, value) in entries {
            self.set_locked(&mut store, key, StoredEntry::new(value, expire));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        self.delete_locked(&mut store, key);
        Ok(())
    }

    async fn delete_multi(&self, keys: &[String]) -> Result<()> {
        let mut store = self.store.write().await;
        for key in keys {
            self.delete_locked(&mut store, key);
        }
        Ok(())
    }
}
