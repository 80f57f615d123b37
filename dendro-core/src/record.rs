//! Flattened node records.
//!
//! A [`NodeRecord`] is the lightweight, serialisable view of one cluster-tree
//! node: its identifier, the distance at which its children merged, and the
//! identifiers of its parent and children. Records are created once during
//! [`crate::flatten`] and never change afterwards.

use std::fmt;

use serde::Serialize;

/// Identifier assigned to a cluster-tree node during one flattening pass.
///
/// Identifiers are sequential in registration (post-order) order and start
/// at `0`. They are only meaningful within the pass that produced them.
///
/// # Examples
/// ```
/// use dendro_core::NodeId;
///
/// let id = NodeId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Flattened view of a single cluster-tree node.
///
/// Serialises as `{"rid": id, "lc": left?, "rc": right?, "cd": distance}`;
/// the child fields are omitted for leaves and the parent link is never
/// serialised.
///
/// # Examples
/// ```
/// use dendro_core::{NodeId, NodeRecord};
///
/// let left = NodeRecord::new(NodeId::new(0), None, None, 0.0);
/// let right = NodeRecord::new(NodeId::new(1), None, None, 0.0);
/// let parent = NodeRecord::new(NodeId::new(2), Some(&left), Some(&right), 0.5);
/// assert!(left.is_leaf());
/// assert!(!parent.is_leaf());
/// assert_eq!(parent.left(), Some(NodeId::new(0)));
/// assert_eq!(parent.child_distance(), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord {
    #[serde(rename = "rid")]
    id: NodeId,
    #[serde(rename = "lc", skip_serializing_if = "Option::is_none")]
    left: Option<NodeId>,
    #[serde(rename = "rc", skip_serializing_if = "Option::is_none")]
    right: Option<NodeId>,
    #[serde(rename = "cd")]
    child_distance: f64,
    #[serde(skip)]
    parent: Option<NodeId>,
}

impl NodeRecord {
    /// Wraps a node given its already-constructed children.
    #[must_use]
    pub fn new(
        id: NodeId,
        left: Option<&Self>,
        right: Option<&Self>,
        child_distance: f64,
    ) -> Self {
        Self::from_links(id, left.map(Self::id), right.map(Self::id), child_distance)
    }

    pub(crate) const fn from_links(
        id: NodeId,
        left: Option<NodeId>,
        right: Option<NodeId>,
        child_distance: f64,
    ) -> Self {
        Self {
            id,
            left,
            right,
            child_distance,
            parent: None,
        }
    }

    /// Returns the identifier of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns `true` when the node has no children.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns the distance at which this node's children were merged.
    #[must_use]
    pub const fn child_distance(&self) -> f64 {
        self.child_distance
    }

    /// Returns the left child identifier, if any.
    #[must_use]
    pub const fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Returns the right child identifier, if any.
    #[must_use]
    pub const fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Returns the parent identifier; `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn leaf_serialises_without_child_links() {
        let leaf = NodeRecord::new(NodeId::new(3), None, None, 0.0);
        let value = serde_json::to_value(&leaf).expect("record must serialise");
        assert_eq!(value, json!({ "rid": 3, "cd": 0.0 }));
    }

    #[rstest]
    fn internal_node_serialises_child_links() {
        let left = NodeRecord::new(NodeId::new(0), None, None, 0.0);
        let right = NodeRecord::new(NodeId::new(1), None, None, 0.0);
        let mut parent = NodeRecord::new(NodeId::new(2), Some(&left), Some(&right), 0.25);
        parent.set_parent(NodeId::new(9));
        let value = serde_json::to_value(&parent).expect("record must serialise");
        assert_eq!(value, json!({ "rid": 2, "lc": 0, "rc": 1, "cd": 0.25 }));
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(Some(0), None, false)]
    #[case(None, Some(1), false)]
    fn leaf_flag_tracks_child_links(
        #[case] left: Option<u64>,
        #[case] right: Option<u64>,
        #[case] expected: bool,
    ) {
        let left_record = left.map(|raw| NodeRecord::new(NodeId::new(raw), None, None, 0.0));
        let right_record = right.map(|raw| NodeRecord::new(NodeId::new(raw), None, None, 0.0));
        let record = NodeRecord::new(
            NodeId::new(5),
            left_record.as_ref(),
            right_record.as_ref(),
            1.0,
        );
        assert_eq!(record.is_leaf(), expected);
    }
}
