//! # Cache Containers
//!
//! Typed cache-aside wrappers between application code and a slow,
//! authoritative data source. A container is constructed per call site,
//! bound to one logical value ([`Simple`]) or a set of them ([`Attribute`]):
//! `get` consults the backend, pulls misses from the source, repopulates the
//! backend and returns the merged result. `dirty` flows the other way,
//! removing entries and cascading through declared dependency edges with
//! cycle-safe deduplication.
//!
//! The layer is a stateless protocol over whatever concurrency the backend
//! and source provide: no locks, no retries, no in-flight pull
//! deduplication, and no error wrapping — collaborator failures propagate
//! untouched.

use std::time::Duration;

pub mod attribute;
pub mod invalidation;
pub mod simple;

pub use attribute::{Attribute, BulkSource, ByColumn, ColumnAttribute};
pub use invalidation::{ContainerId, Dependency, VisitedSet};
pub use simple::Simple;

/// Default entry lifetime for containers that do not override `expire`.
pub const DEFAULT_EXPIRE: Duration = Duration::from_secs(3600);
