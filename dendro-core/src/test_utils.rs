//! Shared test utilities for `dendro-core`.

use dendro_test_support::proptest_profile::ProptestRunProfile;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    linkage::Dendrogram,
    table::{DenseTable, SparseTable},
    tree::ClusterTree,
};

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Hand-assembled tree whose nodes are indices into `nodes`.
///
/// Unlike [`Dendrogram`] it performs no validation, so tests can describe
/// shared subtrees, cycles, and non-finite distances.
#[derive(Clone, Debug)]
pub(crate) struct ArenaTree {
    pub(crate) root: u32,
    pub(crate) nodes: Vec<ArenaNode>,
}

#[derive(Clone, Debug)]
pub(crate) struct ArenaNode {
    pub(crate) children: Option<(u32, u32)>,
    pub(crate) distance: f64,
    pub(crate) row: Option<usize>,
}

impl ArenaNode {
    pub(crate) fn leaf(row: usize) -> Self {
        Self {
            children: None,
            distance: 0.0,
            row: Some(row),
        }
    }

    pub(crate) fn merge(left: u32, right: u32, distance: f64) -> Self {
        Self {
            children: Some((left, right)),
            distance,
            row: None,
        }
    }
}

impl ClusterTree for ArenaTree {
    type Node = u32;

    fn root(&self) -> u32 {
        self.root
    }

    fn children(&self, node: u32) -> Option<(u32, u32)> {
        self.nodes.get(node as usize).and_then(|entry| entry.children)
    }

    fn child_distance(&self, node: u32) -> f64 {
        self.nodes.get(node as usize).map_or(0.0, |entry| entry.distance)
    }

    fn leaf_row(&self, node: u32) -> Option<usize> {
        self.nodes.get(node as usize).and_then(|entry| entry.row)
    }
}

/// Three-leaf tree: rows 0 and 1 merge at 0.5, row 2 joins at 0.9.
pub(crate) fn three_leaf_tree() -> Dendrogram {
    Dendrogram::from_merges(3, &[(0, 1, 0.5), (3, 2, 0.9)]).expect("valid merges")
}

/// One-column dense table with the given cells.
pub(crate) fn dense_column(cells: &[&str]) -> DenseTable {
    let rows = cells.iter().map(|cell| vec![(*cell).to_owned()]).collect();
    DenseTable::new(vec!["x".to_owned()], rows).expect("valid table")
}

/// Sparse table over columns `a`, `b`, `c`.
pub(crate) fn sparse_abc(rows: Vec<Vec<(usize, f64)>>) -> SparseTable {
    SparseTable::new(vec!["a".into(), "b".into(), "c".into()], rows).expect("valid table")
}

/// Strategy producing valid merge lists over `1..=max_rows` leaves.
///
/// Each step joins two distinct available nodes picked by index, so every
/// generated list forms a single binary tree. Distances are drawn from a
/// small set to exercise rank ties.
pub(crate) fn merge_list(
    max_rows: usize,
) -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (1..=max_rows).prop_flat_map(|rows| {
        let steps = rows - 1;
        let pick = (
            any::<prop::sample::Index>(),
            any::<prop::sample::Index>(),
            0_u8..6,
        );
        (Just(rows), proptest::collection::vec(pick, steps))
            .prop_map(|(rows, picks)| {
                let mut available: Vec<usize> = (0..rows).collect();
                let mut merges = Vec::with_capacity(picks.len());
                for (step, (first, second, distance)) in picks.into_iter().enumerate() {
                    let left = available.swap_remove(first.index(available.len()));
                    let right = available.swap_remove(second.index(available.len()));
                    merges.push((left, right, f64::from(distance) * 0.5));
                    available.push(rows + step);
                }
                (rows, merges)
            })
    })
}
