//! Global centroid index for sparse details.

use std::collections::BTreeMap;

use crate::table::{SparseCentroid, SparseTable};

/// Weight and label of one column of the global centroid.
#[derive(Clone, Debug, PartialEq)]
pub struct CentroidEntry {
    /// Mean weight of the column over every row.
    pub weight: f64,
    /// Column label.
    pub label: String,
}

/// Column-indexed view of the root node's centroid.
///
/// Built once when a sparse session opens and never modified afterwards.
///
/// # Examples
/// ```
/// use dendro_core::{CentroidIndex, SparseTable};
///
/// let table = SparseTable::new(
///     vec!["a".into(), "b".into()],
///     vec![vec![(0, 2.0)], vec![(1, 4.0)]],
/// )?;
/// let index = CentroidIndex::from_centroid(&table.centroid(&[0, 1]), &table);
/// assert_eq!(index.get(1).map(|entry| entry.weight), Some(2.0));
/// assert_eq!(index.get(1).map(|entry| entry.label.as_str()), Some("b"));
/// # Ok::<(), dendro_core::TableError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CentroidIndex {
    entries: BTreeMap<usize, CentroidEntry>,
}

impl CentroidIndex {
    /// Indexes `centroid` by column, labelling columns from `table`.
    #[must_use]
    pub fn from_centroid(centroid: &SparseCentroid, table: &SparseTable) -> Self {
        let entries = centroid
            .iter()
            .map(|(column, weight)| {
                let label = column_label(table, column);
                (column, CentroidEntry { weight, label })
            })
            .collect();
        Self { entries }
    }

    /// Returns the entry for `column`.
    #[must_use]
    pub fn get(&self, column: usize) -> Option<&CentroidEntry> {
        self.entries.get(&column)
    }

    /// Returns the number of indexed columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no column is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CentroidEntry)> {
        self.entries.iter().map(|(column, entry)| (*column, entry))
    }
}

pub(crate) fn column_label(table: &SparseTable, column: usize) -> String {
    table
        .label(column)
        .map_or_else(|| format!("column {column}"), ToOwned::to_owned)
}
