//! On-demand detail resolution for flattened nodes.
//!
//! A client that has received the ranked node stream asks for the details of
//! one node at a time. Dense data resolves to the node's member rows; sparse
//! data resolves to the node's strongest centroid columns and their deviation
//! from the global centroid. Unknown identifiers resolve to
//! [`Details::NotFound`], which is an ordinary outcome rather than an error.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::{
    centroid::{CentroidIndex, column_label},
    flatten::NodeRegistry,
    record::NodeId,
    table::{ClusterData, DenseTable, MISSING_VALUE, SparseTable},
    tree::ClusterTree,
};

/// Default number of columns reported for a sparse node.
pub const DEFAULT_SPARSE_DETAIL_LIMIT: usize = 10;

/// Member rows of a dense node.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseDetails {
    /// Column labels.
    pub columns: Vec<String>,
    /// Member rows in leaf order; missing cells are empty strings.
    pub rows: Vec<Vec<String>>,
}

/// One reported column of a sparse node.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseDetailRow {
    /// Column index.
    pub column: usize,
    /// Column label.
    pub label: String,
    /// Mean weight of the column over the node's member rows.
    pub weight: f64,
    /// Label of the same column in the global centroid index.
    pub global_label: String,
    /// `weight` minus the column's global centroid weight.
    pub deviation: f64,
}

/// Strongest centroid columns of a sparse node.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseDetails {
    /// Number of non-zero centroid columns before the limit was applied.
    pub available: usize,
    /// Reported columns, strongest first.
    pub rows: Vec<SparseDetailRow>,
}

/// Result of a detail query.
#[derive(Clone, Debug, PartialEq)]
pub enum Details {
    /// Member rows of a dense node.
    Dense(DenseDetails),
    /// Strongest columns of a sparse node.
    Sparse(SparseDetails),
    /// The identifier was not issued by the current flattening pass.
    NotFound(NodeId),
}

impl Details {
    /// Returns `true` for [`Details::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense(details) => {
                writeln!(f, "{}", details.columns.join("\t"))?;
                for row in &details.rows {
                    writeln!(f, "{}", row.join("\t"))?;
                }
                Ok(())
            }
            Self::Sparse(details) => {
                writeln!(f, "label\tweight\tglobal label\tdeviation")?;
                for row in &details.rows {
                    writeln!(
                        f,
                        "{}\t{}\t{}\t{:+}",
                        row.label, row.weight, row.global_label, row.deviation
                    )?;
                }
                Ok(())
            }
            Self::NotFound(id) => writeln!(f, "no content for id {id}"),
        }
    }
}

/// Resolves details against an immutable tree, registry, and centroid index.
///
/// The resolver only reads shared state, so it is `Send + Sync` whenever the
/// tree is and may serve queries from several threads at once.
pub struct DetailResolver<'a, T: ClusterTree + ?Sized> {
    tree: &'a T,
    data: &'a ClusterData,
    registry: &'a NodeRegistry<T::Node>,
    centroid: &'a CentroidIndex,
    sparse_detail_limit: usize,
}

impl<'a, T: ClusterTree + ?Sized> DetailResolver<'a, T> {
    pub(crate) const fn new(
        tree: &'a T,
        data: &'a ClusterData,
        registry: &'a NodeRegistry<T::Node>,
        centroid: &'a CentroidIndex,
        sparse_detail_limit: usize,
    ) -> Self {
        Self {
            tree,
            data,
            registry,
            centroid,
            sparse_detail_limit,
        }
    }

    /// Resolves the details of `id`.
    #[must_use]
    pub fn resolve(&self, id: NodeId) -> Details {
        #[cfg(feature = "metrics")]
        metrics::counter!("dendro_detail_queries").increment(1);

        let Some(handle) = self.registry.handle(id) else {
            debug!(id = %id, "detail query for unknown node");
            #[cfg(feature = "metrics")]
            metrics::counter!("dendro_detail_not_found").increment(1);
            return Details::NotFound(id);
        };
        let members = self.tree.members(handle);
        trace!(id = %id, members = members.len(), kind = self.data.kind(), "resolving details");
        match self.data {
            ClusterData::Dense(table) => Details::Dense(dense_details(table, &members)),
            ClusterData::Sparse(table) => Details::Sparse(self.sparse_details(table, &members)),
        }
    }

    fn sparse_details(&self, table: &SparseTable, members: &[usize]) -> SparseDetails {
        let centroid = table.centroid(members);
        let available = centroid.len();
        if self.sparse_detail_limit > available {
            debug!(
                limit = self.sparse_detail_limit,
                available, "sparse detail limit clamped to available columns"
            );
        }

        let mut ranked: Vec<(usize, f64)> = centroid.iter().collect();
        ranked.sort_unstable_by(|left, right| by_weight_then_column(*left, *right));
        let rows = ranked
            .into_iter()
            .take(self.sparse_detail_limit)
            .map(|(column, weight)| {
                let label = column_label(table, column);
                let (global_label, global_weight) = self.centroid.get(column).map_or_else(
                    || (label.clone(), 0.0),
                    |entry| (entry.label.clone(), entry.weight),
                );
                SparseDetailRow {
                    column,
                    label,
                    weight,
                    global_label,
                    deviation: weight - global_weight,
                }
            })
            .collect();
        SparseDetails { available, rows }
    }
}

fn by_weight_then_column(left: (usize, f64), right: (usize, f64)) -> Ordering {
    right.1.total_cmp(&left.1).then_with(|| left.0.cmp(&right.0))
}

fn dense_details(table: &DenseTable, members: &[usize]) -> DenseDetails {
    let rows = members
        .iter()
        .filter_map(|&row| table.row(row))
        .map(|cells| {
            cells
                .iter()
                .map(|cell| {
                    if cell == MISSING_VALUE {
                        String::new()
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect();
    DenseDetails {
        columns: table.columns().to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case((1, 3.0), (2, 5.0), Ordering::Greater)]
    #[case((2, 5.0), (1, 3.0), Ordering::Less)]
    #[case((1, 2.0), (4, 2.0), Ordering::Less)]
    #[case((4, 2.0), (1, 2.0), Ordering::Greater)]
    fn sparse_columns_order_by_weight_then_index(
        #[case] left: (usize, f64),
        #[case] right: (usize, f64),
        #[case] expected: Ordering,
    ) {
        assert_eq!(by_weight_then_column(left, right), expected);
    }

    #[rstest]
    fn not_found_renders_placeholder() {
        let details = Details::NotFound(NodeId::new(42));
        assert!(details.is_not_found());
        assert_eq!(details.to_string(), "no content for id 42\n");
    }

    #[rstest]
    fn sparse_rows_render_signed_deviation() {
        let details = Details::Sparse(SparseDetails {
            available: 1,
            rows: vec![SparseDetailRow {
                column: 0,
                label: "a".into(),
                weight: 1.5,
                global_label: "a".into(),
                deviation: -0.5,
            }],
        });
        assert_eq!(
            details.to_string(),
            "label\tweight\tglobal label\tdeviation\na\t1.5\ta\t-0.5\n"
        );
    }

    #[rstest]
    fn dense_details_blank_missing_cells() {
        let table = DenseTable::new(
            vec!["x".into(), "y".into()],
            vec![
                vec!["1".into(), "?".into()],
                vec!["2".into(), "3".into()],
            ],
        )
        .expect("valid table");
        let details = dense_details(&table, &[1, 0]);
        assert_eq!(
            details.rows,
            vec![
                vec!["2".to_owned(), "3".to_owned()],
                vec!["1".to_owned(), String::new()],
            ]
        );
    }
}
