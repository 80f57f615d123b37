//! Rank ordering of flattened nodes.
//!
//! Nodes merged at a larger distance rank first, so a client receiving the
//! stream in order sees the coarse structure of the dendrogram before its
//! fine detail. Equal distances are broken by ascending [`NodeId`], which
//! makes the order total and deterministic for a given flattening pass.

use std::cmp::Ordering;

use crate::{
    flatten::NodeRegistry,
    record::{NodeId, NodeRecord},
};

/// Sort key implementing the rank order.
///
/// Distances compare with [`f64::total_cmp`], so the order is total even for
/// signed zeros.
///
/// # Examples
/// ```
/// use dendro_core::{NodeId, RankKey};
///
/// let coarse = RankKey::new(0.9, NodeId::new(4));
/// let fine = RankKey::new(0.5, NodeId::new(2));
/// let tie = RankKey::new(0.5, NodeId::new(3));
/// assert!(coarse < fine);
/// assert!(fine < tie);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RankKey {
    distance: f64,
    id: NodeId,
}

impl RankKey {
    /// Creates a key for a node merged at `distance`.
    #[must_use]
    pub const fn new(distance: f64, id: NodeId) -> Self {
        Self { distance, id }
    }

    /// Creates the key for `record`.
    #[must_use]
    pub const fn of(record: &NodeRecord) -> Self {
        Self::new(record.child_distance(), record.id())
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

/// Returns every registered identifier in rank order.
#[must_use]
pub fn rank<N>(registry: &NodeRegistry<N>) -> Vec<NodeId>
where
    N: Copy + Eq + std::hash::Hash,
{
    let mut keys: Vec<RankKey> = registry.iter().map(RankKey::of).collect();
    keys.sort_unstable();
    keys.into_iter().map(|key| key.id).collect()
}

/// Iterator streaming records in rank order.
pub struct Ranked<'a, N> {
    registry: &'a NodeRegistry<N>,
    order: std::vec::IntoIter<NodeId>,
}

impl<'a, N> Ranked<'a, N>
where
    N: Copy + Eq + std::hash::Hash,
{
    /// Ranks `registry` and prepares to stream its records.
    #[must_use]
    pub fn new(registry: &'a NodeRegistry<N>) -> Self {
        Self {
            registry,
            order: rank(registry).into_iter(),
        }
    }
}

impl<'a, N> Iterator for Ranked<'a, N>
where
    N: Copy + Eq + std::hash::Hash,
{
    type Item = &'a NodeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let registry = self.registry;
        self.order.find_map(|id| registry.get(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}
