//! Simple container: cache-aside around one logical value

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

/// Cache-aside wrapper around a single logical value identified by one key.
///
/// Implementors provide the backend, the key and the pull; the trait supplies
/// the protocol: [`get`](Simple::get) probes the backend and pulls through on
/// a miss, [`dirty`](Simple::dirty) removes the entry and cascades into
/// declared dependents, [`refresh`](Simple::refresh) forces a repopulation.
///
/// Containers are transient values constructed per call site; nothing here
/// holds state beyond the backend handle, so concurrent callers each build
/// their own instance. Two concurrent `get` calls that both miss will both
/// pull — there is no in-flight deduplication.
#[async_trait]
pub trait Simple: Send + Sync + Sized {
    /// The cached value type.
    type Value: Serialize + DeserializeOwned + Send + Sync;

    /// The backend this container caches into.
    fn cache(&self) -> SharedBackend;

    /// Cache key for this container.
    ///
    /// Must be deterministic in the constructor arguments and collision-free
    /// across distinct logical values.
    fn key(&self) -> String;

    /// Fetch the value from the authoritative source.
    async fn pull(&self) -> Result<Option<Self::Value>>;

    /// Entry lifetime applied when `get` populates the backend.
    fn expire(&self) -> Option<Duration> {
        Some(DEFAULT_EXPIRE)
    }

    /// Containers to invalidate whenever this one is dirtied.
    fn dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    /// Identity used to deduplicate this container within one cascading
    /// invalidation.
    fn identity(&self) -> ContainerId {
        ContainerId::of::<Self>(self.key())
    }

    /// Return the cached value, pulling and repopulating on a miss.
    ///
    /// An absent pull result is returned as-is and never cached, so a value
    /// missing from the authoritative source is re-pulled on every call
    /// until it exists.
    async fn get(&self) -> Result<Option<Self::Value>> {
        let key = self.key();
        if let Some(bytes) = self.cache().get(&key).await? {
            debug!(key = %key, "cache hit");
            return Ok(Some(codec::decode(&bytes)?));
        }

        debug!(key = %key, "cache miss");
        match self.pull().await? {
            Some(value) => {
                self.cache()
                    .set(&key, codec::encode(&value)?, self.expire())
                    .await?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Remove this container's entry and cascade into its dependents.
    async fn dirty(&self) -> Result<()> {
        let mut visited = VisitedSet::new();
        self.dirty_visited(&mut visited).await
    }

    /// Cascade step carrying the visited set of the current invalidation.
    ///
    /// A container whose identity is already in the set is skipped entirely,
    /// which keeps cyclic and diamond-shaped declarations finite and each
    /// backend delete from running twice.
    async fn dirty_visited(&self, visited: &mut VisitedSet) -> Result<()> {
        if !visited.insert(self.identity()) {
            return Ok(());
        }

        let key = self.key();
        debug!(key = %key, "dirty");
        self.cache().delete(&key).await?;

        for dependency in self.dependencies() {
            dependency.dirty_visited(visited).await?;
        }
        Ok(())
    }

    /// Force a repopulation: `dirty` followed by `get`.
    async fn refresh(&self) -> Result<Option<Self::Value>> {
        self.dirty().await?;
        self.get().await
    }
}
