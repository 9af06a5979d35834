//! Attribute container: cache-aside around a batch of values
//!
//! Bound to a set of logical items sharing one container type, and designed
//! to minimize round-trips to both the cache and the data source: one bulk
//! probe against the backend, then at most one bulk pull for exactly the
//! items the probe missed. A full cache hit never touches the source.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::backend::SharedBackend;
use crate::codec;
use crate::container::invalidation::{ContainerId, Dependency, VisitedSet};
use crate::container::DEFAULT_EXPIRE;
use crate::error::Result;

/// Cache-aside wrapper around a batch of values identified by a set of items.
#[async_trait]
pub trait Attribute: Send + Sync + Sized {
    /// The item type keys are derived from.
    type Item: Eq + Hash + Clone + Send + Sync + 'static;

    /// The cached value type.
    type Value: Serialize + DeserializeOwned + Send + Sync;

    /// The backend this container caches into.
    fn cache(&self) -> SharedBackend;

    /// Cache key for one item.
    ///
    /// Must be deterministic and collision-free across distinct items.
    fn key(&self, item: &Self::Item) -> String;

    /// Fetch values for a set of items from the authoritative source.
    ///
    /// Items the source does not know are simply omitted from the returned
    /// mapping.
    async fn pull(&self, items: &[Self::Item]) -> Result<HashMap<Self::Item, Self::Value>>;

    /// Entry lifetime applied when `get_many` populates the backend.
    fn expire(&self) -> Option<Duration> {
        Some(DEFAULT_EXPIRE)
    }

    /// Containers to invalidate whenever these items are dirtied.
    fn dependencies(&self, items: &[Self::Item]) -> Vec<Dependency> {
        let _ = items;
        Vec::new()
    }

    /// Identity used to deduplicate this container within one cascading
    /// invalidation. Item order does not matter.
    fn identity(&self, items: &[Self::Item]) -> ContainerId {
        let mut keys: Vec<String> = items.iter().map(|item| self.key(item)).collect();
        keys.sort();
        ContainerId::of::<Self>(keys.join(","))
    }

    /// Return the values for a set of items, pulling whatever the cache
    /// misses.
    ///
    /// The protocol:
    /// 1. one bulk probe against the backend for every requested item;
    /// 2. on a full hit, return the probe results directly;
    /// 3. otherwise a single `pull` for exactly the miss set, followed by one
    ///    bulk populate of everything the pull returned;
    /// 4. merge pulled values with probe hits. An item absent from both is
    ///    omitted from the result rather than an error.
    ///
    /// `pull` runs at most once per call, regardless of the miss-set size.
    /// Requested items are de-duplicated first (set semantics).
    async fn get_many(&self, items: &[Self::Item]) -> Result<HashMap<Self::Item, Self::Value>> {
        let mut seen = HashSet::with_capacity(items.len());
        let items: Vec<&Self::Item> = items.iter().filter(|item| seen.insert(*item)).collect();

        let keys: Vec<String> = items.iter().map(|&item| self.key(item)).collect();
        let cached = self.cache().get_multi(&keys).await?;

        let mut result = HashMap::with_capacity(items.len());
        let mut missed: Vec<Self::Item> = Vec::new();
        for (item, key) in items.iter().zip(&keys) {
            match cached.get(key) {
                Some(bytes) => {
                    result.insert((*item).clone(), codec::decode(bytes)?);
                }
                None => missed.push((*item).clone()),
            }
        }

        if missed.is_empty() {
            debug!(requested = items.len(), "full cache hit");
            return Ok(result);
        }

        debug!(
            requested = items.len(),
            missed = missed.len(),
            "pulling missed items"
        );
        let pulled = self.pull(&missed).await?;
        if !pulled.is_empty() {
            let mut entries = HashMap::with_capacity(pulled.len());
            for (item, value) in &pulled {
                entries.insert(self.key(item), codec::encode(value)?);
            }
            self.cache().set_multi(entries, self.expire()).await?;
        }

        result.extend(pulled);
        Ok(result)
    }

    /// Return the value for a single item, or `None` if neither the cache
    /// nor the source has it.
    async fn get_one(&self, item: &Self::Item) -> Result<Option<Self::Value>> {
        let mut result = self.get_many(std::slice::from_ref(item)).await?;
        Ok(result.remove(item))
    }

    /// Remove the cache entries for exactly the given items and cascade into
    /// declared dependents.
    async fn dirty(&self, items: &[Self::Item]) -> Result<()> {
        let mut visited = VisitedSet::new();
        self.dirty_visited(items, &mut visited).await
    }

    /// Cascade step carrying the visited set of the current invalidation.
    async fn dirty_visited(&self, items: &[Self::Item], visited: &mut VisitedSet) -> Result<()> {
        if !visited.insert(self.identity(items)) {
            return Ok(());
        }

        let keys: Vec<String> = items.iter().map(|item| self.key(item)).collect();
        debug!(count = keys.len(), "dirty items");
        self.cache().delete_multi(&keys).await?;

        for dependency in self.dependencies(items) {
            dependency.dirty_visited(visited).await?;
        }
        Ok(())
    }
}

/// Bulk "fetch where column in items" interface consumed from the query
/// layer. The only thing the container layer requires from it is a batch
/// lookup returning the matching rows.
#[async_trait]
pub trait BulkSource<I, R>: Send + Sync {
    /// Fetch every row whose key column value is in `items`.
    async fn fetch_in(&self, items: &[I]) -> Result<Vec<R>>;
}

/// Declaration of an attribute container whose values mirror one keyed
/// column of a [`BulkSource`].
///
/// Wrap the declaration in [`ByColumn`] to obtain the [`Attribute`]
/// behavior: `pull` fetches the rows for the miss set and re-keys them by
/// their column value, so only the source binding and the key layout have to
/// be written out.
pub trait ColumnAttribute: Send + Sync + Sized {
    /// The item type keys are derived from.
    type Item: Eq + Hash + Clone + Send + Sync + 'static;

    /// The row type fetched from the source.
    type Row: Serialize + DeserializeOwned + Send + Sync;

    /// The backend this container caches into.
    fn cache(&self) -> SharedBackend;

    /// Cache key for one item.
    fn key(&self, item: &Self::Item) -> String;

    /// The backing data source.
    fn source(&self) -> &dyn BulkSource<Self::Item, Self::Row>;

    /// Key column value of a fetched row.
    fn column(&self, row: &Self::Row) -> Self::Item;

    /// Entry lifetime applied when the derived `get_many` populates the
    /// backend.
    fn expire(&self) -> Option<Duration> {
        Some(DEFAULT_EXPIRE)
    }

    /// Containers to invalidate whenever these items are dirtied.
    fn dependencies(&self, items: &[Self::Item]) -> Vec<Dependency> {
        let _ = items;
        Vec::new()
    }
}

/// Adapter turning a [`ColumnAttribute`] declaration into an [`Attribute`]
/// container.
pub struct ByColumn<C>(pub C);

#[async_trait]
impl<C: ColumnAttribute> Attribute for ByColumn<C> {
    type Item = C::Item;
    type Value = C::Row;

    fn cache(&self) -> SharedBackend {
        self.0.cache()
    }

    fn key(&self, item: &Self::Item) -> String {
        self.0.key(item)
    }

    async fn pull(&self, items: &[Self::Item]) -> Result<HashMap<Self::Item, Self::Value>> {
        let rows = self.0.source().fetch_in(items).await?;
        Ok(rows
            .into_iter()
            .map(|row| (self.0.column(&row), row))
            .collect())
    }

    fn expire(&self) -> Option<Duration> {
        self.0.expire()
    }

    fn dependencies(&self, items: &[Self::Item]) -> Vec<Dependency> {
        self.0.dependencies(items)
    }
}
