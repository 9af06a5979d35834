//! Error types for cache operations
//!
//! This module defines the error type shared by every backend and container,
//! carrying enough detail to tell which collaborator failed.

use thiserror::Error;

/// Main error type for cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend error - store-level failure not covered by a client wrapper
    #[error("Backend error: {0}")]
    Backend(String),

    /// Redis client error (wrapper)
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Redis connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// Memcached client error (wrapper)
    #[error("Memcached error: {0}")]
    Memcached(#[from] memcache::MemcacheError),

    /// Value could not be serialized for a networked store
    #[error("Serialization error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Stored bytes could not be deserialized back into a value
    #[error("Deserialization error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

impl From<String> for CacheError {
    fn from(s: String) -> Self {
        CacheError::Other(s)
    }
}

impl From<&str> for CacheError {
    fn from(s: &str) -> Self {
        CacheError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CacheError::Backend("store unreachable".to_string());
        assert_eq!(error.to_string(), "Backend error: store unreachable");

        let error = CacheError::Config("unknown backend type".to_string());
        assert!(error.to_string().contains("unknown backend type"));
    }

    #[test]
    fn test_error_conversion() {
        let error: CacheError = "test error".into();
        assert!(matches!(error, CacheError::Other(_)));

        let error: CacheError = "test error".to_string().into();
        assert!(matches!(error, CacheError::Other(_)));
    }
}
