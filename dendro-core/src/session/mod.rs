//! Session object tying a cluster tree to its data table.
//!
//! A [`Session`] owns everything a detail query needs: the tree, the data
//! table, the flattened registry, and (for sparse data) the global centroid
//! index. All of it is computed once in [`Session::open`] and read-only
//! afterwards, so a session can be shared across threads by reference.

mod gate;

use tracing::{info, instrument};

use crate::{
    builder::DendroConfig,
    centroid::CentroidIndex,
    detail::{DetailResolver, Details},
    error::{DendroError, Result},
    flatten::{NodeRegistry, flatten},
    linkage::Dendrogram,
    rank::Ranked,
    record::NodeId,
    table::ClusterData,
    tree::ClusterTree,
};

pub use self::gate::{SessionGate, SessionPermit};

/// A flattened cluster tree ready to stream ranked records and resolve
/// details.
///
/// # Examples
/// ```
/// use dendro_core::{ClusterData, DendroBuilder, DenseTable, Details, Session};
///
/// let table = DenseTable::new(
///     vec!["x".into()],
///     vec![vec!["0".into()], vec!["1".into()], vec!["10".into()]],
/// )?;
/// let config = DendroBuilder::new().build()?;
/// let session = Session::cluster(ClusterData::from(table), &config)?;
///
/// let first = session.ranked().next().expect("tree has a root");
/// assert_eq!(first.id(), session.root());
/// match session.resolve(session.root()) {
///     Details::Dense(details) => assert_eq!(details.rows.len(), 3),
///     other => panic!("unexpected details: {other:?}"),
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Session<T: ClusterTree> {
    tree: T,
    data: ClusterData,
    registry: NodeRegistry<T::Node>,
    root: NodeId,
    centroid: CentroidIndex,
    sparse_detail_limit: usize,
}

impl<T: ClusterTree> Session<T> {
    /// Flattens `tree` and prepares detail resolution against `data`.
    ///
    /// # Errors
    /// Propagates [`flatten`] failures, returns
    /// [`DendroError::MissingLeafRow`] when a leaf has no data row and
    /// [`DendroError::LeafRowOutOfBounds`] when a leaf points past the end of
    /// `data`.
    #[instrument(
        name = "core.session_open",
        err,
        skip(tree, data, config),
        fields(rows = data.len(), kind = data.kind()),
    )]
    pub fn open(tree: T, data: ClusterData, config: &DendroConfig) -> Result<Self> {
        let flattened = flatten(&tree)?;
        let root = flattened.root();
        let registry = flattened.into_registry();
        validate_leaf_rows(&tree, &registry, data.len())?;

        let centroid = match &data {
            ClusterData::Sparse(table) => {
                let members = tree.members(tree.root());
                CentroidIndex::from_centroid(&table.centroid(&members), table)
            }
            ClusterData::Dense(_) => CentroidIndex::default(),
        };

        info!(
            nodes = registry.len(),
            centroid_columns = centroid.len(),
            "session opened"
        );
        Ok(Self {
            tree,
            data,
            registry,
            root,
            centroid,
            sparse_detail_limit: config.sparse_detail_limit(),
        })
    }

    /// Returns the identifier of the tree root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the flattened registry.
    #[must_use]
    pub const fn registry(&self) -> &NodeRegistry<T::Node> {
        &self.registry
    }

    /// Streams every record in rank order.
    #[must_use]
    pub fn ranked(&self) -> Ranked<'_, T::Node> {
        Ranked::new(&self.registry)
    }

    /// Returns a resolver borrowing this session's state.
    #[must_use]
    pub const fn resolver(&self) -> DetailResolver<'_, T> {
        DetailResolver::new(
            &self.tree,
            &self.data,
            &self.registry,
            &self.centroid,
            self.sparse_detail_limit,
        )
    }

    /// Resolves the details of `id`.
    #[must_use]
    pub fn resolve(&self, id: NodeId) -> Details {
        self.resolver().resolve(id)
    }

    /// Returns the number of flattened nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns whether the session holds no nodes; never true once opened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Returns the underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &T {
        &self.tree
    }

    /// Returns the data table.
    #[must_use]
    pub const fn data(&self) -> &ClusterData {
        &self.data
    }

    /// Returns the global centroid index; empty for dense data.
    #[must_use]
    pub const fn centroid(&self) -> &CentroidIndex {
        &self.centroid
    }
}

impl Session<Dendrogram> {
    /// Clusters `data` with the configured linkage and opens a session over
    /// the resulting tree.
    ///
    /// # Errors
    /// Propagates [`Dendrogram::build`] and [`Session::open`] failures.
    pub fn cluster(data: ClusterData, config: &DendroConfig) -> Result<Self> {
        let tree = Dendrogram::build(&data, config.linkage())?;
        Self::open(tree, data, config)
    }
}

fn validate_leaf_rows<T: ClusterTree>(
    tree: &T,
    registry: &NodeRegistry<T::Node>,
    rows: usize,
) -> Result<()> {
    for (handle, record) in registry.entries() {
        if !record.is_leaf() {
            continue;
        }
        let id = record.id();
        let row = tree
            .leaf_row(handle)
            .ok_or(DendroError::MissingLeafRow { id })?;
        if row >= rows {
            return Err(DendroError::LeafRowOutOfBounds { id, row, rows });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
