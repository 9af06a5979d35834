//! Redis backend
//!
//! Single-node typed-protocol store driven through a `deadpool-redis`
//! connection pool. Bulk operations are issued as pipelined batches in one
//! round-trip. Expiry uses `SETEX` for single writes; inside pipelines it is
//! applied as a per-key `EXPIRE` immediately after each `SET`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use tracing::info;

use crate::backend::CacheBackend;
use crate::error::{CacheError, Result};

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Redis-backed key/value store.
///
/// The key prefix is fixed at construction and prepended to every logical key
/// before it reaches the server; returned maps are keyed by the logical key.
pub struct RedisBackend {
    pool: Pool,
    prefix: String,
}

impl RedisBackend {
    /// Create a backend against `host` (a `host:port` pair) and a logical
    /// database index.
    ///
    /// Pool creation performs no I/O; connections are established on first
    /// use and any connection failure surfaces from the operation that
    /// triggered it.
    pub fn connect(
        host: &str,
        db: i64,
        prefix: impl Into<String>,
        pool_size: usize,
    ) -> Result<Self> {
        let prefix = prefix.into();
        let mut config = deadpool_redis::Config::from_url(format!("redis://{host}/{db}"));
        config.pool = Some(PoolConfig::new(pool_size));
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::Config(e.to_string()))?;

        info!(host = %host, db = db, prefix = %prefix, "redis backend configured");
        Ok(Self { pool, prefix })
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.pool.get().await?;
        let value: Option<Vec<u8>> = conn.get(self.scoped(key)).await?;
        Ok(value)
    }

    async fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.pool.get().await?;
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.get(self.scoped(key));
        }
        let values: Vec<Option<Vec<u8>>> = pipe.query_async(&mut conn).await?;

        let mut result = HashMap::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(values) {
            if let Some(value) = value {
                result.insert(key.clone(), value);
            }
        }
        Ok(result)
    }

    async fn set(&self, key: &str, value: Vec<u8>, expire: Option<Duration>) -> Result<()> {
        let mut conn = self.pool.get().await?;
        match expire {
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(self.scoped(key), value, ttl.as_secs())
                    .await?
            }
            None => conn.set::<_, _, ()>(self.scoped(key), value).await?,
        }
        Ok(())
    }

    async fn set_multi(
        &self,
        entries: HashMap<String, Vec<u8>>,
        expire: Option<Duration>,
    ) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().await?;
        let mut pipe = redis::pipe();
        for (key, value) in entries {
            let key = self.scoped(&key);
            pipe.set(&key, value).ignore();
            if let Some(ttl) = expire {
                pipe.expire(&key, ttl.as_secs() as i64).ignore();
            }
        }
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(self.scoped(key)).await?;
        Ok(())
    }

    async fn delete_multi(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().await?;
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.del(self.scoped(key)).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }
}
