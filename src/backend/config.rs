//! Backend configuration and the named registry
//!
//! Deployments describe their stores as a name → [`BackendConfig`] mapping
//! (typically deserialized from a config file). [`CacheRegistry::from_config`]
//! constructs every backend once at startup; the registry value is then passed
//! by reference to whatever builds containers. There is no ambient global
//! lookup.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::memcached::MemcachedBackend;
use crate::backend::memory::MemoryBackend;
use crate::backend::redis::{RedisBackend, DEFAULT_POOL_SIZE};
use crate::backend::SharedBackend;
use crate::error::{CacheError, Result};

fn default_memcached_hosts() -> Vec<String> {
    vec!["localhost:11211".to_string()]
}

fn default_redis_host() -> String {
    "localhost:6379".to_string()
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

/// Construction parameters for one backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-process store
    Memory {
        /// Optional LRU bound on the number of entries
        #[serde(default)]
        max_entries: Option<usize>,
    },

    /// Hash-distributed store spread over one or more hosts
    #[serde(alias = "memcache")]
    Memcached {
        #[serde(default = "default_memcached_hosts")]
        hosts: Vec<String>,

        /// Key prefix isolating this instance within a shared store
        #[serde(default)]
        prefix: String,
    },

    /// Single-node store with a logical database index
    Redis {
        #[serde(default = "default_redis_host")]
        host: String,

        #[serde(default)]
        db: i64,

        /// Key prefix isolating this instance within a shared store
        #[serde(default)]
        prefix: String,

        #[serde(default = "default_pool_size")]
        pool_size: usize,
    },
}

impl BackendConfig {
    /// Construct the backend this configuration describes.
    pub fn build(&self) -> Result<SharedBackend> {
        match self {
            BackendConfig::Memory { max_entries } => {
                Ok(Arc::new(MemoryBackend::with_max_entries(*max_entries)))
            }
            BackendConfig::Memcached { hosts, prefix } => {
                Ok(Arc::new(MemcachedBackend::connect(hosts, prefix.clone())?))
            }
            BackendConfig::Redis {
                host,
                db,
                prefix,
                pool_size,
            } => Ok(Arc::new(RedisBackend::connect(
                host,
                *db,
                prefix.clone(),
                *pool_size,
            )?)),
        }
    }
}

/// Named collection of constructed backends.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    backends: HashMap<String, SharedBackend>,
}

impl CacheRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct every configured backend and register it under its name.
    pub fn from_config(config: &HashMap<String, BackendConfig>) -> Result<Self> {
        let mut registry = Self::new();
        for (name, backend_config) in config {
            info!(name = %name, "constructing cache backend");
            registry.insert(name.clone(), backend_config.build()?);
        }
        Ok(registry)
    }

    /// Register a backend under a name, replacing any previous holder.
    pub fn insert(&mut self, name: impl Into<String>, backend: SharedBackend) {
        self.backends.insert(name.into(), backend);
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<SharedBackend> {
        self.backends.get(name).cloned()
    }

    /// Look up a backend by name, failing with a configuration error if it
    /// was never registered.
    pub fn require(&self, name: &str) -> Result<SharedBackend> {
        self.get(name)
            .ok_or_else(|| CacheError::Config(format!("no cache backend named '{name}'")))
    }

    /// Names of all registered backends.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_config() {
        let raw = r#"
        {
            "local": {"type": "memory"},
            "bounded": {"type": "memory", "max_entries": 512},
            "shared": {"type": "redis", "host": "cache.internal:6379", "db": 2, "prefix": "app:"},
            "legacy": {"type": "memcache", "hosts": ["a:11211", "b:11211"]}
        }"#;

        let config: HashMap<String, BackendConfig> = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            config["local"],
            BackendConfig::Memory { max_entries: None }
        ));
        assert!(matches!(
            config["bounded"],
            BackendConfig::Memory {
                max_entries: Some(512)
            }
        ));

        match &config["shared"] {
            BackendConfig::Redis {
                host,
                db,
                prefix,
                pool_size,
            } => {
                assert_eq!(host, "cache.internal:6379");
                assert_eq!(*db, 2);
                assert_eq!(prefix, "app:");
                assert_eq!(*pool_size, DEFAULT_POOL_SIZE);
            }
            other => panic!("expected redis config, got {other:?}"),
        }

        match &config["legacy"] {
            BackendConfig::Memcached { hosts, prefix } => {
                assert_eq!(hosts.len(), 2);
                assert_eq!(prefix, "");
            }
            other => panic!("expected memcached config, got {other:?}"),
        }
    }

    #[test]
    fn test_registry_from_config_builds_memory_backends() {
        let config = HashMap::from([(
            "local".to_string(),
            BackendConfig::Memory { max_entries: None },
        )]);

        let registry = CacheRegistry::from_config(&config).unwrap();
        assert!(registry.get("local").is_some());
        assert!(registry.get("missing").is_none());
        assert!(registry.require("missing").is_err());
    }
}
