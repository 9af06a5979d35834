//! Memcached backend
//!
//! Hash-distributed store: keys are spread across the configured hosts by the
//! client's consistent hashing, speaking the binary protocol. The client is
//! synchronous, so every operation runs on the blocking thread pool.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task;
use tracing::info;

use crate::backend::CacheBackend;
use crate::error::{CacheError, Result};

/// Memcached-backed key/value store.
pub struct MemcachedBackend {
    client: Arc<memcache::Client>,
    prefix: String,
}

impl MemcachedBackend {
    /// Connect to one or more `host:port` pairs.
    pub fn connect(hosts: &[String], prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let urls: Vec<String> = hosts
            .iter()
            .map(|host| format!("memcache://{host}"))
            .collect();
        let client = memcache::Client::connect(urls)?;

        info!(hosts = ?hosts, prefix = %prefix, "memcached backend connected");
        Ok(Self {
            client: Arc::new(client),
            prefix,
        })
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // 0 means "never expire" on the wire, so sub-second TTLs round up to 1s.
    fn expiration(expire: Option<Duration>) -> u32 {
        match expire {
            Some(ttl) => ttl.as_secs().max(1) as u32,
            None => 0,
        }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&memcache::Client) -> std::result::Result<T, memcache::MemcacheError>
            + Send
            + 'static,
    {
        let client = Arc::clone(&self.client);
        let result = task::spawn_blocking(move || op(&client))
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(result?)
    }
}

#[async_trait]
impl CacheBackend for MemcachedBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let key = self.scoped(key);
        self.blocking(move |client| client.get::<Vec<u8>>(&key))
            .await
    }

    async fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let scoped: Vec<String> = keys.iter().map(|key| self.scoped(key)).collect();
        let mut fetched = self
            .blocking(move |client| {
                let refs: Vec<&str> = scoped.iter().map(String::as_str).collect();
                client.gets::<Vec<u8>>(&refs)
            })
            .await?;

        let mut result = HashMap::with_capacity(fetched.len());
        for key in keys {
            if let Some(value) = fetched.remove(&self.scoped(key)) {
                result.insert(key.clone(), value);
            }
        }
        Ok(result)
    }

    async fn set(&self, key: &str, value: Vec<u8>, expire: Option<Duration>) -> Result<()> {
        let key = self.scoped(key);
        let expiration = Self::expiration(expire);
        self.blocking(move |client| client.set(&key, value.as_slice(), expiration))
            .await
    }

    async fn set_multi(
        &self,
        entries: HashMap<String, Vec<u8>>,
        expire: Option<Duration>,
    ) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let scoped: Vec<(String, Vec<u8>)> = entries
            .into_iter()
            .map(|(key, value)| (self.scoped(&key), value))
            .collect();
        let expiration = Self::expiration(expire);
        self.blocking(move |client| {
            for (key, value) in &scoped {
                client.set(key, value.as_slice(), expiration)?;
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let key = self.scoped(key);
        self.blocking(move |client| client.delete(&key).map(|_| ()))
            .await
    }

    async fn delete_multi(&self, keys: &[String]) -> Result<()> {
        let scoped: Vec<String> = keys.iter().map(|key| self.scoped(key)).collect();
        self.blocking(move |client| {
            for key in &scoped {
                client.delete(key)?;
            }
            Ok(())
        })
        .await
    }
}
