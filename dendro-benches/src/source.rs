//! Seeded synthetic tables for benchmarking.
//!
//! Dense tables hold uniformly random coordinates rendered as strings, the
//! way a delimited file would arrive. Sparse tables hold a fixed number of
//! random non-zero columns per row.

use dendro_core::{ClusterData, DenseTable, SparseTable};
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index};

use crate::error::BenchSetupError;

/// Errors that may occur during synthetic table generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested row count was zero.
    #[error("row count must be greater than zero")]
    ZeroRows,
    /// The requested column count was zero.
    #[error("column count must be greater than zero")]
    ZeroColumns,
    /// More non-zero entries per row were requested than there are columns.
    #[error("{requested} non-zero entries per row exceed {columns} columns")]
    TooDense {
        /// Requested non-zero entries per row.
        requested: usize,
        /// Available columns.
        columns: usize,
    },
}

/// Configuration for synthetic table generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of rows to generate.
    pub row_count: usize,
    /// Number of columns in the header.
    pub columns: usize,
    /// Non-zero entries per sparse row; ignored for dense tables.
    pub non_zero: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl SyntheticConfig {
    fn validate(&self) -> Result<(), SyntheticError> {
        if self.row_count == 0 {
            return Err(SyntheticError::ZeroRows);
        }
        if self.columns == 0 {
            return Err(SyntheticError::ZeroColumns);
        }
        Ok(())
    }

    fn labels(&self) -> Vec<String> {
        (0..self.columns).map(|column| format!("c{column}")).collect()
    }
}

/// Generates a dense table of random coordinates.
///
/// # Errors
/// Returns [`BenchSetupError::Synthetic`] for zero rows or columns.
///
/// # Examples
/// ```
/// use dendro_benches::source::{SyntheticConfig, dense_table};
///
/// let config = SyntheticConfig { row_count: 10, columns: 4, non_zero: 0, seed: 42 };
/// let data = dense_table(&config).expect("valid config");
/// assert_eq!(data.len(), 10);
/// ```
pub fn dense_table(config: &SyntheticConfig) -> Result<ClusterData, BenchSetupError> {
    config.validate()?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let rows = (0..config.row_count)
        .map(|_| {
            (0..config.columns)
                .map(|_| format!("{:.4}", rng.gen_range(0.0_f64..1.0_f64)))
                .collect()
        })
        .collect();
    Ok(DenseTable::new(config.labels(), rows)?.into())
}

/// Generates a sparse table with `non_zero` random columns per row.
///
/// # Errors
/// Returns [`BenchSetupError::Synthetic`] for zero rows or columns, or when
/// `non_zero` exceeds `columns`.
///
/// # Examples
/// ```
/// use dendro_benches::source::{SyntheticConfig, sparse_table};
///
/// let config = SyntheticConfig { row_count: 8, columns: 32, non_zero: 4, seed: 7 };
/// let data = sparse_table(&config).expect("valid config");
/// assert_eq!(data.len(), 8);
/// ```
pub fn sparse_table(config: &SyntheticConfig) -> Result<ClusterData, BenchSetupError> {
    config.validate()?;
    if config.non_zero > config.columns {
        return Err(SyntheticError::TooDense {
            requested: config.non_zero,
            columns: config.columns,
        }
        .into());
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let rows = (0..config.row_count)
        .map(|_| {
            let mut picked = index::sample(&mut rng, config.columns, config.non_zero).into_vec();
            picked.sort_unstable();
            picked
                .into_iter()
                .map(|column| (column, rng.gen_range(0.1_f64..5.0_f64)))
                .collect()
        })
        .collect();
    Ok(SparseTable::new(config.labels(), rows)?.into())
}
