//! Identifier-indexed storage for flattened node records.

use std::collections::HashMap;
use std::hash::Hash;

use crate::record::{NodeId, NodeRecord};

/// Lookup table from [`NodeId`] to [`NodeRecord`], populated once by
/// [`crate::flatten`].
///
/// Records live in a dense vector indexed by identifier. A side table maps
/// each tree handle to its identifier and the reverse vector maps identifiers
/// back to handles so detail queries can reach the underlying node.
#[derive(Clone, Debug)]
pub struct NodeRegistry<N> {
    records: Vec<NodeRecord>,
    handles: Vec<N>,
    ids: HashMap<N, NodeId>,
}

impl<N> NodeRegistry<N>
where
    N: Copy + Eq + Hash,
{
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            handles: Vec::with_capacity(capacity),
            ids: HashMap::with_capacity(capacity),
        }
    }

    pub(super) fn next_id(&self) -> NodeId {
        NodeId::new(self.records.len() as u64)
    }

    /// Registers `handle` with a record built by `build` for the next id.
    pub(super) fn insert(&mut self, handle: N, build: impl FnOnce(NodeId) -> NodeRecord) -> NodeId {
        let id = self.next_id();
        self.records.push(build(id));
        self.handles.push(handle);
        self.ids.insert(handle, id);
        id
    }

    pub(super) fn link_parent(&mut self, child: NodeId, parent: NodeId) {
        if let Some(record) = child.index().and_then(|index| self.records.get_mut(index)) {
            record.set_parent(parent);
        }
    }

    /// Returns the record registered under `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        id.index().and_then(|index| self.records.get(index))
    }

    /// Returns whether `id` was issued by this registry.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the tree handle that produced `id`.
    #[must_use]
    pub fn handle(&self, id: NodeId) -> Option<N> {
        id.index()
            .and_then(|index| self.handles.get(index))
            .copied()
    }

    /// Returns the identifier assigned to `handle`.
    #[must_use]
    pub fn id_of(&self, handle: N) -> Option<NodeId> {
        self.ids.get(&handle).copied()
    }

    /// Returns the number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether no node has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
        self.records.iter()
    }

    /// Iterates over `(handle, record)` pairs in identifier order.
    pub fn entries(&self) -> impl Iterator<Item = (N, &NodeRecord)> {
        self.handles.iter().copied().zip(self.records.iter())
    }
}
