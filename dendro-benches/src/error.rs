//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise while preparing benchmark data so
//! setup functions can propagate failures with `?`.

use crate::source::SyntheticError;
use dendro_core::{DendroError, TableError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic table generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// A generated table failed validation.
    #[error("table validation failed: {0}")]
    Table(#[from] TableError),
    /// Tree construction or session setup failed.
    #[error("dendrogram setup failed: {0}")]
    Dendro(#[from] DendroError),
}
