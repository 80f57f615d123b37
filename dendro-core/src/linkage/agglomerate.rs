//! Pairwise distances and merge ordering for agglomerative clustering.
//!
//! Both strategies emit a merge list in the format accepted by
//! [`super::Dendrogram::from_merges`]: node `rows + k` is created by merge
//! `k`.

use std::cmp::Ordering;

use crate::table::{ClusterData, SparseTable};

use super::{Linkage, union_find::DisjointSet};

pub(super) type Merge = (usize, usize, f64);

/// Rows of a table as points in a metric space.
pub(super) enum PointSet<'a> {
    Dense(Vec<Vec<f64>>),
    Sparse(&'a SparseTable),
}

impl<'a> PointSet<'a> {
    pub(super) fn from_data(data: &'a ClusterData) -> Self {
        match data {
            ClusterData::Dense(table) => Self::Dense(table.numeric_matrix()),
            ClusterData::Sparse(table) => Self::Sparse(table),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Dense(rows) => rows.len(),
            Self::Sparse(table) => table.len(),
        }
    }

    fn distance(&self, left: usize, right: usize) -> f64 {
        match self {
            Self::Dense(rows) => match (rows.get(left), rows.get(right)) {
                (Some(a), Some(b)) => a
                    .iter()
                    .zip(b)
                    .fold(0.0_f64, |acc, (x, y)| acc.hypot(x - y)),
                _ => 0.0,
            },
            Self::Sparse(table) => table.distance(left, right),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    left: usize,
    right: usize,
    distance: f64,
}

impl Edge {
    fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.left.cmp(&other.left))
            .then_with(|| self.right.cmp(&other.right))
    }
}

#[cfg(feature = "cpu")]
fn pairwise_edges(points: &PointSet<'_>) -> Vec<Edge> {
    use rayon::prelude::*;

    let n = points.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|left| {
            ((left + 1)..n).map(move |right| Edge {
                left,
                right,
                distance: points.distance(left, right),
            })
        })
        .collect()
}

#[cfg(not(feature = "cpu"))]
fn pairwise_edges(points: &PointSet<'_>) -> Vec<Edge> {
    let n = points.len();
    (0..n)
        .flat_map(|left| {
            ((left + 1)..n).map(move |right| Edge {
                left,
                right,
                distance: points.distance(left, right),
            })
        })
        .collect()
}

/// Kruskal-style single linkage over the complete pairwise graph.
pub(super) fn single_linkage(points: &PointSet<'_>) -> Vec<Merge> {
    let n = points.len();
    let mut edges = pairwise_edges(points);
    edges.sort_unstable_by(Edge::cmp_by_distance);

    let mut dsu = DisjointSet::new(n);
    let mut merges = Vec::with_capacity(n.saturating_sub(1));
    for edge in edges {
        if merges.len() + 1 >= n {
            break;
        }
        let left_root = dsu.find(edge.left);
        let right_root = dsu.find(edge.right);
        if left_root == right_root {
            continue;
        }
        let new_node = n + merges.len();
        merges.push((
            dsu.component_node[left_root],
            dsu.component_node[right_root],
            edge.distance,
        ));
        let merged = dsu.union(left_root, right_root);
        dsu.component_node[merged] = new_node;
    }
    merges
}

/// Complete or average linkage via the Lance–Williams update.
pub(super) fn lance_williams(points: &PointSet<'_>, linkage: Linkage) -> Vec<Merge> {
    let n = points.len();
    let mut matrix = vec![0.0_f64; n * n];
    for edge in pairwise_edges(points) {
        matrix[edge.left * n + edge.right] = edge.distance;
        matrix[edge.right * n + edge.left] = edge.distance;
    }

    let mut active = vec![true; n];
    let mut sizes = vec![1_usize; n];
    let mut node_of: Vec<usize> = (0..n).collect();
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    for step in 0..n.saturating_sub(1) {
        let Some((left, right, distance)) = closest_pair(&matrix, &active, n) else {
            break;
        };
        merges.push((node_of[left], node_of[right], distance));

        let left_size = sizes[left] as f64;
        let right_size = sizes[right] as f64;
        for other in 0..n {
            if !active[other] || other == left || other == right {
                continue;
            }
            let to_left = matrix[left * n + other];
            let to_right = matrix[right * n + other];
            let updated = match linkage {
                Linkage::Complete => to_left.max(to_right),
                Linkage::Average | Linkage::Single => {
                    // Weighting before summing keeps the mean within range.
                    let total = left_size + right_size;
                    to_left * (left_size / total) + to_right * (right_size / total)
                }
            };
            matrix[left * n + other] = updated;
            matrix[other * n + left] = updated;
        }

        sizes[left] += sizes[right];
        active[right] = false;
        node_of[left] = n + step;
    }
    merges
}

/// Returns the active pair with the smallest distance, lowest indices first
/// on ties.
fn closest_pair(matrix: &[f64], active: &[bool], n: usize) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for left in (0..n).filter(|&index| active[index]) {
        for right in ((left + 1)..n).filter(|&index| active[index]) {
            let distance = matrix[left * n + right];
            if best.is_none_or(|(_, _, current)| distance.total_cmp(&current) == Ordering::Less) {
                best = Some((left, right, distance));
            }
        }
    }
    best
}
