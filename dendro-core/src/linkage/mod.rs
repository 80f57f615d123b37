//! Agglomerative construction of cluster trees.
//!
//! A [`Dendrogram`] is an arena of binary nodes: the first `rows` nodes are
//! leaves (one per data row, in row order) and every later node records one
//! merge. It implements [`ClusterTree`] so it can be flattened and queried
//! like any externally produced tree.
//!
//! Trees are built from a [`ClusterData`] table with one of three linkage
//! rules:
//!
//! - [`Linkage::Single`] sorts all pairwise distances and merges components
//!   with a union-find, one dendrogram node per successful union.
//! - [`Linkage::Complete`] and [`Linkage::Average`] repeatedly merge the
//!   closest pair of active clusters and update the remaining distances with
//!   the Lance–Williams recurrence.
//!
//! Ties are broken by the lower cluster index first so construction is
//! deterministic.

mod agglomerate;
mod union_find;

use std::fmt;

use tracing::{debug, instrument};

use crate::{
    error::{DendroError, Result},
    table::ClusterData,
    tree::ClusterTree,
};

/// Rule used to compute the distance between two clusters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Linkage {
    /// Distance between the closest members.
    Single,
    /// Distance between the farthest members.
    Complete,
    /// Mean distance over all member pairs.
    #[default]
    Average,
}

impl Linkage {
    /// Returns the lowercase name of the rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct DendrogramNode {
    children: Option<(usize, usize)>,
    distance: f64,
    row: Option<usize>,
    size: usize,
}

/// Arena-backed binary cluster tree.
///
/// # Examples
/// ```
/// use dendro_core::{ClusterTree, Dendrogram};
///
/// // Leaves 0 and 1 merge into node 3, which merges with leaf 2 into node 4.
/// let tree = Dendrogram::from_merges(3, &[(0, 1, 0.5), (3, 2, 0.9)])?;
/// assert_eq!(tree.root(), 4);
/// assert_eq!(tree.children(4), Some((3, 2)));
/// assert_eq!(tree.members(3), vec![0, 1]);
/// # Ok::<(), dendro_core::DendroError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dendrogram {
    nodes: Vec<DendrogramNode>,
    root: usize,
}

impl Dendrogram {
    /// Builds a tree from an ordered merge list.
    ///
    /// Nodes `0..rows` are leaves. Merge `k` joins two available nodes at the
    /// given distance and creates node `rows + k`. The merges must join every
    /// leaf into a single root.
    ///
    /// # Errors
    /// Returns [`DendroError::EmptyTable`] when `rows == 0`,
    /// [`DendroError::InvalidMerge`] when a merge references a node that does
    /// not exist yet or was already merged, and [`DendroError::Disconnected`]
    /// when more than one root remains.
    pub fn from_merges(rows: usize, merges: &[(usize, usize, f64)]) -> Result<Self> {
        if rows == 0 {
            return Err(DendroError::EmptyTable);
        }
        let mut nodes: Vec<DendrogramNode> = (0..rows)
            .map(|row| DendrogramNode {
                children: None,
                distance: 0.0,
                row: Some(row),
                size: 1,
            })
            .collect();
        let mut available = vec![true; rows];

        for (step, &(left, right, distance)) in merges.iter().enumerate() {
            let left_size = take_available(&mut available, &nodes, step, left)?;
            let right_size = take_available(&mut available, &nodes, step, right)?;
            nodes.push(DendrogramNode {
                children: Some((left, right)),
                distance,
                row: None,
                size: left_size + right_size,
            });
            available.push(true);
        }

        let roots = available.iter().filter(|flag| **flag).count();
        if roots != 1 {
            return Err(DendroError::Disconnected { roots });
        }
        let root = nodes.len() - 1;
        Ok(Self { nodes, root })
    }

    /// Clusters `data` with the given linkage rule.
    ///
    /// # Errors
    /// Returns [`DendroError::EmptyTable`] when `data` has no rows and
    /// [`DendroError::DistanceOverflow`] when two clusters lie farther apart
    /// than an `f64` can hold.
    #[instrument(
        name = "core.linkage",
        err,
        skip(data, linkage),
        fields(rows = data.len(), kind = data.kind(), linkage = %linkage),
    )]
    pub fn build(data: &ClusterData, linkage: Linkage) -> Result<Self> {
        if data.is_empty() {
            return Err(DendroError::EmptyTable);
        }
        let points = agglomerate::PointSet::from_data(data);
        let merges = match linkage {
            Linkage::Single => agglomerate::single_linkage(&points),
            Linkage::Complete | Linkage::Average => {
                agglomerate::lance_williams(&points, linkage)
            }
        };
        if let Some(&(left, right, _)) = merges.iter().find(|merge| !merge.2.is_finite()) {
            return Err(DendroError::DistanceOverflow { left, right });
        }
        debug!(merges = merges.len(), "agglomeration completed");
        Self::from_merges(data.len(), &merges)
    }

    /// Returns the number of nodes, leaves included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the tree has no nodes; never true for a built tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of data rows beneath `node`.
    #[must_use]
    pub fn size(&self, node: usize) -> Option<usize> {
        self.nodes.get(node).map(|entry| entry.size)
    }
}

fn take_available(
    available: &mut [bool],
    nodes: &[DendrogramNode],
    step: usize,
    node: usize,
) -> Result<usize> {
    match (available.get_mut(node), nodes.get(node)) {
        (Some(flag), Some(entry)) if *flag => {
            *flag = false;
            Ok(entry.size)
        }
        _ => Err(DendroError::InvalidMerge { step, node }),
    }
}

impl ClusterTree for Dendrogram {
    type Node = usize;

    fn root(&self) -> usize {
        self.root
    }

    fn children(&self, node: usize) -> Option<(usize, usize)> {
        self.nodes.get(node).and_then(|entry| entry.children)
    }

    fn child_distance(&self, node: usize) -> f64 {
        self.nodes.get(node).map_or(0.0, |entry| entry.distance)
    }

    fn leaf_row(&self, node: usize) -> Option<usize> {
        self.nodes.get(node).and_then(|entry| entry.row)
    }
}
