//! # Larder
//!
//! Pull-through cache containers with pluggable key/value backends.
//!
//! Larder sits between application code and a slow, authoritative data
//! source, transparently caching results in a swappable store, batching
//! lookups, and propagating invalidation through declared dependency edges.
//!
//! ## Features
//!
//! - Cache-aside containers for single values and batches
//! - Partial-hit batch merging: one bulk probe, at most one bulk pull
//! - Cascading, cycle-safe invalidation across dependent containers
//! - Three interchangeable backends: in-process, memcached, redis
//! - MessagePack value codec for the networked stores
//! - Named backend registry built once from configuration
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use larder::{MemoryBackend, Result, SharedBackend, Simple};
//!
//! struct UserProfile {
//!     cache: SharedBackend,
//!     user_id: u64,
//! }
//!
//! #[async_trait]
//! impl Simple for UserProfile {
//!     type Value = String;
//!
//!     fn cache(&self) -> SharedBackend {
//!         Arc::clone(&self.cache)
//!     }
//!
//!     fn key(&self) -> String {
//!         format!("profile:{}", self.user_id)
//!     }
//!
//!     async fn pull(&self) -> Result<Option<String>> {
//!         // authoritative lookup goes here
//!         Ok(Some("profile data".to_string()))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let cache: SharedBackend = Arc::new(MemoryBackend::new());
//!
//!     let container = UserProfile { cache: Arc::clone(&cache), user_id: 42 };
//!     let _miss = container.get().await?; // pulls and populates
//!     let _hit = container.get().await?;  // served from the backend
//!     container.dirty().await?;           // removes the entry, cascades
//!     Ok(())
//! }
//! ```
//!
//! ## Invalidation
//!
//! A container type declares its dependents by returning [`Dependency`]
//! edges from `dependencies()`. Dirtying then walks the declared graph,
//! visiting each distinct logical container at most once, so mutually
//! dependent types are safe:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use async_trait::async_trait;
//! # use larder::{Dependency, Result, SharedBackend, Simple};
//! # #[derive(Clone)]
//! # struct TeamRoster { cache: SharedBackend, team_id: u64 }
//! # #[derive(Clone)]
//! # struct MemberIndex { cache: SharedBackend, team_id: u64 }
//! #[async_trait]
//! impl Simple for TeamRoster {
//!     type Value = Vec<String>;
//!
//!     fn cache(&self) -> SharedBackend {
//!         Arc::clone(&self.cache)
//!     }
//!
//!     fn key(&self) -> String {
//!         format!("roster:{}", self.team_id)
//!     }
//!
//!     fn dependencies(&self) -> Vec<Dependency> {
//!         vec![Dependency::simple(MemberIndex {
//!             cache: Arc::clone(&self.cache),
//!             team_id: self.team_id,
//!         })]
//!     }
//!
//!     async fn pull(&self) -> Result<Option<Vec<String>>> {
//!         Ok(Some(vec!["alex".to_string()]))
//!     }
//! }
//! # #[async_trait]
//! # impl Simple for MemberIndex {
//! #     type Value = Vec<u64>;
//! #     fn cache(&self) -> SharedBackend { Arc::clone(&self.cache) }
//! #     fn key(&self) -> String { format!("members:{}", self.team_id) }
//! #     async fn pull(&self) -> Result<Option<Vec<u64>>> { Ok(Some(vec![1])) }
//! # }
//! ```

pub mod backend;
pub mod codec;
pub mod container;
pub mod error;

// Re-export main types for convenience
pub use backend::{
    BackendConfig, CacheBackend, CacheRegistry, MemcachedBackend, MemoryBackend, MemoryStats,
    RedisBackend, SharedBackend, StoredEntry,
};
pub use container::{
    Attribute, BulkSource, ByColumn, ColumnAttribute, ContainerId, Dependency, Simple, VisitedSet,
    DEFAULT_EXPIRE,
};
pub use error::{CacheError, Result};
