//! Cascading invalidation across containers
//!
//! Dirtying a container removes its cache entries and then dirties every
//! container it declares as a dependent. Declarations may form diamonds or
//! cycles, so the cascade is an explicit graph traversal carrying a visited
//! set: each distinct logical container — identified by its concrete type and
//! constructor arguments — is dirtied at most once per invalidation. The set
//! is created empty at the outermost `dirty` call and threaded by mutable
//! reference through every recursive step.
//!
//! Edges are recomputed by calling `dependencies()` during the traversal;
//! the graph is never materialized or persisted.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::container::attribute::Attribute;
use crate::container::simple::Simple;
use crate::error::Result;

/// Identity of a logical container: its concrete type plus the arguments it
/// was constructed over.
///
/// Two separately allocated container values with equal identity are the same
/// logical container for invalidation purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId {
    kind: &'static str,
    args: String,
}

impl ContainerId {
    /// Identity from an explicit type label and argument rendering.
    pub fn new(kind: &'static str, args: impl Into<String>) -> Self {
        Self {
            kind,
            args: args.into(),
        }
    }

    /// Identity for a concrete container type, labeled by its type name.
    pub fn of<C>(args: impl Into<String>) -> Self {
        Self::new(std::any::type_name::<C>(), args)
    }
}

/// Containers already dirtied within one invalidation operation.
pub type VisitedSet = HashSet<ContainerId>;

/// Object-safe hook a dependency edge uses to dirty its target.
#[async_trait]
trait DirtyTarget: Send + Sync {
    async fn dirty_visited(&self, visited: &mut VisitedSet) -> Result<()>;
}

/// A declared invalidation edge from one container to another.
///
/// Construct with [`Dependency::simple`] or [`Dependency::attribute`]; a
/// container's `dependencies()` returns these and the cascade follows them.
/// The target's own dependencies are only consulted when the traversal
/// actually visits it, so mutually dependent declarations stay finite.
pub struct Dependency {
    target: Box<dyn DirtyTarget>,
}

impl Dependency {
    /// Edge to a simple container.
    pub fn simple<C>(container: C) -> Self
    where
        C: Simple + 'static,
    {
        Self {
            target: Box::new(SimpleEdge(container)),
        }
    }

    /// Edge to an attribute container, scoped to the items to invalidate.
    pub fn attribute<C>(container: C, items: Vec<C::Item>) -> Self
    where
        C: Attribute + 'static,
    {
        Self {
            target: Box::new(AttributeEdge { container, items }),
        }
    }

    pub(crate) async fn dirty_visited(&self, visited: &mut VisitedSet) -> Result<()> {
        self.target.dirty_visited(visited).await
    }
}

struct SimpleEdge<C>(C);

#[async_trait]
impl<C> DirtyTarget for SimpleEdge<C>
where
    C: Simple + 'static,
{
    async fn dirty_visited(&self, visited: &mut VisitedSet) -> Result<()> {
        self.0.dirty_visited(visited).await
    }
}

struct AttributeEdge<C: Attribute> {
    container: C,
    items: Vec<C::Item>,
}

#[async_trait]
impl<C> DirtyTarget for AttributeEdge<C>
where
    C: Attribute + 'static,
{
    async fn dirty_visited(&self, visited: &mut VisitedSet) -> Result<()> {
        self.container.dirty_visited(&self.items, visited).await
    }
}
