//! Small on-disk table fixtures in the formats read by `dendro-providers`.
//!
//! The fixtures are raw text so every crate can use them without depending on
//! the core types.

/// Tab-delimited dense table with three numeric rows.
///
/// Rows 0 and 1 sit one unit apart; row 2 is far from both, so any linkage
/// merges `{0, 1}` first.
pub const DENSE_TSV: &str = "x\ty\n0\t0\n1\t0\n10\t0\n";

/// Comma-delimited dense table with a missing cell in row 1.
pub const DENSE_CSV_WITH_MISSING: &str = "name,score\nalpha,1\nbeta,?\ngamma,5\n";

/// Sparse table with three labelled columns.
///
/// Rows 0 and 1 are identical, row 2 shares no column with them.
pub const SPARSE_TSV: &str = "alpha\tbeta\tgamma\n0:3\t2:1\nalpha:3 gamma:1\n1:4\n";

/// Dense table whose second data row is one cell short.
pub const DENSE_RAGGED_TSV: &str = "x\ty\n0\t0\n1\n";
