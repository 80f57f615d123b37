//! Dense and sparse tables clustered by a dendrogram.
//!
//! Dense tables keep the original string cells so details can be rendered
//! verbatim; [`MISSING_VALUE`] marks an absent cell. Sparse tables store only
//! the non-zero `(column, weight)` entries of each row.

use std::collections::BTreeMap;

use crate::error::TableError;

/// Sentinel stored in dense cells that hold no value.
pub const MISSING_VALUE: &str = "?";

/// Row-major table of string cells with column labels.
///
/// # Examples
/// ```
/// use dendro_core::DenseTable;
///
/// let table = DenseTable::new(
///     vec!["x".into(), "y".into()],
///     vec![vec!["1".into(), "?".into()], vec!["3".into(), "4".into()]],
/// )?;
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.numeric_value(0, 0), Some(1.0));
/// assert_eq!(table.numeric_value(0, 1), None);
/// # Ok::<(), dendro_core::TableError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DenseTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DenseTable {
    /// Creates a table, checking every row against the header width.
    ///
    /// # Errors
    /// Returns [`TableError::RowWidthMismatch`] when a row does not have one
    /// cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(TableError::RowWidthMismatch {
                row,
                expected: columns.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Returns the column labels.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cells of `row`.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Parses the cell at `(row, column)` as a number.
    ///
    /// Missing cells and cells that are not numeric yield `None`.
    #[must_use]
    pub fn numeric_value(&self, row: usize, column: usize) -> Option<f64> {
        let cell = self.rows.get(row)?.get(column)?.trim();
        if cell == MISSING_VALUE {
            return None;
        }
        cell.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    /// Returns the numeric matrix used for distance computations.
    ///
    /// Missing or non-numeric cells are replaced by their column mean;
    /// columns without any numeric value are dropped.
    pub(crate) fn numeric_matrix(&self) -> Vec<Vec<f64>> {
        let means: Vec<Option<f64>> = (0..self.columns.len())
            .map(|column| {
                let values: Vec<f64> = (0..self.rows.len())
                    .filter_map(|row| self.numeric_value(row, column))
                    .collect();
                (!values.is_empty()).then(|| mean(&values))
            })
            .collect();

        (0..self.rows.len())
            .map(|row| {
                means
                    .iter()
                    .enumerate()
                    .filter_map(|(column, column_mean)| {
                        column_mean.map(|fallback| {
                            self.numeric_value(row, column).unwrap_or(fallback)
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

/// Running mean, which stays finite for any finite inputs.
fn mean(values: &[f64]) -> f64 {
    values
        .iter()
        .zip(1_u32..)
        .fold(0.0, |acc, (value, count)| {
            let count = f64::from(count);
            acc - acc / count + value / count
        })
}

/// Table storing only the non-zero `(column, weight)` entries of each row.
///
/// # Examples
/// ```
/// use dendro_core::SparseTable;
///
/// let table = SparseTable::new(
///     vec!["a".into(), "b".into()],
///     vec![vec![(0, 2.0)], vec![(0, 4.0), (1, 1.0)]],
/// )?;
/// let centroid = table.centroid(&[0, 1]);
/// assert_eq!(centroid.columns(), &[0, 1]);
/// assert_eq!(centroid.weights(), &[3.0, 0.5]);
/// # Ok::<(), dendro_core::TableError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SparseTable {
    columns: Vec<String>,
    rows: Vec<Vec<(usize, f64)>>,
}

impl SparseTable {
    /// Creates a table, validating every entry.
    ///
    /// # Errors
    /// Returns [`TableError::ColumnOutOfBounds`] for entries outside the
    /// header, [`TableError::UnorderedColumns`] when a row is not strictly
    /// increasing by column, and [`TableError::NonFiniteWeight`] for NaN or
    /// infinite weights.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<(usize, f64)>>) -> Result<Self, TableError> {
        for (row, entries) in rows.iter().enumerate() {
            let mut previous: Option<usize> = None;
            for &(column, weight) in entries {
                if column >= columns.len() {
                    return Err(TableError::ColumnOutOfBounds {
                        row,
                        column,
                        columns: columns.len(),
                    });
                }
                if previous.is_some_and(|prev| prev >= column) {
                    return Err(TableError::UnorderedColumns { row, column });
                }
                if !weight.is_finite() {
                    return Err(TableError::NonFiniteWeight {
                        row,
                        column,
                        weight,
                    });
                }
                previous = Some(column);
            }
        }
        Ok(Self { columns, rows })
    }

    /// Returns the column labels.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the label of `column`.
    #[must_use]
    pub fn label(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the entries of `row`.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[(usize, f64)]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Computes the mean weight of every column over `rows`.
    ///
    /// Rows lacking a column contribute zero. Columns whose mean is exactly
    /// zero are omitted, and out-of-range rows are ignored.
    #[must_use]
    pub fn centroid(&self, rows: &[usize]) -> SparseCentroid {
        let mut sums: BTreeMap<usize, f64> = BTreeMap::new();
        let mut count = 0_usize;
        for entries in rows.iter().filter_map(|&row| self.rows.get(row)) {
            count += 1;
            for &(column, weight) in entries {
                *sums.entry(column).or_insert(0.0) += weight;
            }
        }
        if count == 0 {
            return SparseCentroid::default();
        }
        let divisor = count as f64;
        let (columns, weights) = sums
            .into_iter()
            .map(|(column, sum)| (column, sum / divisor))
            .filter(|&(_, weight)| weight != 0.0)
            .unzip();
        SparseCentroid { columns, weights }
    }

    /// Euclidean distance between two rows treated as zero-filled vectors.
    ///
    /// Accumulates with `hypot` so large weights do not overflow the sum of
    /// squares.
    pub(crate) fn distance(&self, left: usize, right: usize) -> f64 {
        let empty: &[(usize, f64)] = &[];
        let a = self.row(left).unwrap_or(empty);
        let b = self.row(right).unwrap_or(empty);
        let mut norm = 0.0_f64;
        let (mut i, mut j) = (0, 0);
        loop {
            match (a.get(i), b.get(j)) {
                (Some(&(ca, wa)), Some(&(cb, wb))) => {
                    if ca == cb {
                        norm = norm.hypot(wa - wb);
                        i += 1;
                        j += 1;
                    } else if ca < cb {
                        norm = norm.hypot(wa);
                        i += 1;
                    } else {
                        norm = norm.hypot(wb);
                        j += 1;
                    }
                }
                (Some(&(_, wa)), None) => {
                    norm = norm.hypot(wa);
                    i += 1;
                }
                (None, Some(&(_, wb))) => {
                    norm = norm.hypot(wb);
                    j += 1;
                }
                (None, None) => break,
            }
        }
        norm
    }
}

/// Mean column weights of a set of sparse rows as parallel arrays ordered by
/// column index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseCentroid {
    columns: Vec<usize>,
    weights: Vec<f64>,
}

impl SparseCentroid {
    /// Returns the column indices with a non-zero mean weight.
    #[must_use]
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Returns the mean weights, parallel to [`Self::columns`].
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the number of non-zero columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns whether no column has a non-zero mean.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over `(column, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.columns.iter().copied().zip(self.weights.iter().copied())
    }
}

/// Data clustered by a dendrogram.
#[derive(Clone, Debug, PartialEq)]
pub enum ClusterData {
    /// Dense table of string cells.
    Dense(DenseTable),
    /// Sparse table of weighted columns.
    Sparse(SparseTable),
}

impl ClusterData {
    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Dense(table) => table.len(),
            Self::Sparse(table) => table.len(),
        }
    }

    /// Returns whether the data has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Dense(_) => "dense",
            Self::Sparse(_) => "sparse",
        }
    }
}

impl From<DenseTable> for ClusterData {
    fn from(table: DenseTable) -> Self {
        Self::Dense(table)
    }
}

impl From<SparseTable> for ClusterData {
    fn from(table: SparseTable) -> Self {
        Self::Sparse(table)
    }
}
