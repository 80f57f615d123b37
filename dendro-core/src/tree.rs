//! Read-only binary cluster-tree abstraction.

use std::{fmt, hash::Hash};

/// A finite binary tree recording the order and distance at which groups of
/// data rows were merged.
///
/// Implementations hand out cheap `Copy` handles; the core never mutates the
/// tree. Handles must be unique per node because the flattening walker keys
/// its side table by them.
///
/// # Examples
/// ```
/// use dendro_core::ClusterTree;
///
/// /// Two leaves (`0`, `1`) merged into node `2` at distance `0.5`.
/// struct Pair;
///
/// impl ClusterTree for Pair {
///     type Node = u8;
///
///     fn root(&self) -> u8 { 2 }
///     fn children(&self, node: u8) -> Option<(u8, u8)> { (node == 2).then_some((0, 1)) }
///     fn child_distance(&self, node: u8) -> f64 { if node == 2 { 0.5 } else { 0.0 } }
///     fn leaf_row(&self, node: u8) -> Option<usize> { (node < 2).then_some(usize::from(node)) }
/// }
///
/// assert!(Pair.is_leaf(0));
/// assert_eq!(Pair.members(2), vec![0, 1]);
/// ```
pub trait ClusterTree {
    /// Handle identifying a node of the tree.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Returns the overall root.
    fn root(&self) -> Self::Node;

    /// Returns the `(left, right)` children, or `None` for a leaf.
    fn children(&self, node: Self::Node) -> Option<(Self::Node, Self::Node)>;

    /// Returns the distance at which the node's children were merged.
    fn child_distance(&self, node: Self::Node) -> f64;

    /// Returns the data row represented by a leaf.
    fn leaf_row(&self, node: Self::Node) -> Option<usize>;

    /// Returns `true` when the node has no children.
    fn is_leaf(&self, node: Self::Node) -> bool {
        self.children(node).is_none()
    }

    /// Collects the data rows of every leaf beneath `node`, left to right.
    ///
    /// The walk uses an explicit stack and assumes the tree is acyclic, which
    /// [`crate::flatten`] verifies before a session serves queries.
    fn members(&self, node: Self::Node) -> Vec<usize> {
        let mut rows = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match self.children(current) {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => rows.extend(self.leaf_row(current)),
            }
        }
        rows
    }
}
