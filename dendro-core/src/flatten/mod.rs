//! Cluster-tree flattening.
//!
//! The walker converts a binary [`ClusterTree`] into a flat, identifier
//! indexed [`NodeRegistry`] in a single post-order pass:
//!
//! - Children are registered before their parent, left subtree first.
//! - Identifiers are assigned sequentially in registration order, so the
//!   first leaf of the leftmost branch receives `0` and the root receives the
//!   last identifier.
//! - The traversal keeps an explicit stack, so tree height does not consume
//!   call-stack frames.
//!
//! The input is never mutated. A node reached twice (a shared subtree or a
//! cycle) or a non-finite child distance aborts the walk with an error rather
//! than looping or producing dangling links.

mod registry;

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::{
    error::{DendroError, Result},
    record::{NodeId, NodeRecord},
    tree::ClusterTree,
};

pub use self::registry::NodeRegistry;

/// Output of one flattening pass.
#[derive(Clone, Debug)]
pub struct Flattened<N> {
    root: NodeId,
    registry: NodeRegistry<N>,
    leaves: usize,
}

impl<N> Flattened<N> {
    /// Returns the identifier of the overall root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the registry holding every flattened node.
    #[must_use]
    pub const fn registry(&self) -> &NodeRegistry<N> {
        &self.registry
    }

    /// Returns the number of leaf records.
    #[must_use]
    pub const fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Consumes the pass and returns the registry.
    #[must_use]
    pub fn into_registry(self) -> NodeRegistry<N> {
        self.registry
    }
}

enum Visit<N> {
    Enter(N),
    Exit(N, N, N),
}

/// Flattens `tree` into a [`NodeRegistry`].
///
/// # Errors
/// Returns [`DendroError::MalformedTree`] when a node is reachable more than
/// once and [`DendroError::InvalidDistance`] when a node's child distance is
/// NaN or infinite.
///
/// # Examples
/// ```
/// use dendro_core::{Dendrogram, flatten};
///
/// // Rows 0 and 1 merge at 0.5 (node 3), then row 2 joins at 0.9.
/// let tree = Dendrogram::from_merges(3, &[(0, 1, 0.5), (3, 2, 0.9)])?;
/// let flat = flatten(&tree)?;
/// assert_eq!(flat.registry().len(), 5);
/// assert_eq!(flat.leaf_count(), 3);
/// let root = flat.registry().get(flat.root()).expect("root is registered");
/// assert_eq!(root.child_distance(), 0.9);
/// # Ok::<(), dendro_core::DendroError>(())
/// ```
#[instrument(name = "core.flatten", err, skip(tree), fields(nodes, leaves))]
pub fn flatten<T: ClusterTree + ?Sized>(tree: &T) -> Result<Flattened<T::Node>> {
    let mut registry = NodeRegistry::with_capacity(0);
    let mut seen: HashSet<T::Node> = HashSet::new();
    let mut leaves = 0_usize;
    let mut stack = vec![Visit::Enter(tree.root())];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(node) => {
                if !seen.insert(node) {
                    return Err(malformed(node));
                }
                if let Some((left, right)) = tree.children(node) {
                    stack.push(Visit::Exit(node, left, right));
                    stack.push(Visit::Enter(right));
                    stack.push(Visit::Enter(left));
                } else {
                    let distance = checked_distance(tree, node, registry.next_id())?;
                    registry.insert(node, |id| NodeRecord::from_links(id, None, None, distance));
                    leaves += 1;
                }
            }
            Visit::Exit(node, left, right) => {
                let distance = checked_distance(tree, node, registry.next_id())?;
                let left_id = registry.id_of(left).ok_or_else(|| malformed(left))?;
                let right_id = registry.id_of(right).ok_or_else(|| malformed(right))?;
                let id = registry.insert(node, |id| {
                    NodeRecord::from_links(id, Some(left_id), Some(right_id), distance)
                });
                registry.link_parent(left_id, id);
                registry.link_parent(right_id, id);
            }
        }
    }

    let root = registry
        .id_of(tree.root())
        .ok_or_else(|| malformed(tree.root()))?;
    let span = tracing::Span::current();
    span.record("nodes", registry.len());
    span.record("leaves", leaves);
    debug!(root = %root, "cluster tree flattened");
    #[cfg(feature = "metrics")]
    metrics::histogram!("dendro_flatten_nodes").record(registry.len() as f64);

    Ok(Flattened {
        root,
        registry,
        leaves,
    })
}

fn checked_distance<T: ClusterTree + ?Sized>(tree: &T, node: T::Node, id: NodeId) -> Result<f64> {
    let distance = tree.child_distance(node);
    if distance.is_finite() {
        Ok(distance)
    } else {
        Err(DendroError::InvalidDistance { id, distance })
    }
}

fn malformed<N: std::fmt::Debug>(node: N) -> DendroError {
    DendroError::MalformedTree {
        node: format!("{node:?}"),
    }
}
