//! Benchmark parameter types.

use std::fmt;

use dendro_core::Linkage;

/// Parameters for a tree construction benchmark run.
#[derive(Clone, Debug)]
pub struct LinkageBenchParams {
    /// Number of rows in the table.
    pub row_count: usize,
    /// Linkage rule under test.
    pub linkage: Linkage,
}

impl fmt::Display for LinkageBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},linkage={}", self.row_count, self.linkage)
    }
}

/// Parameters for flattening and detail benchmarks.
#[derive(Clone, Debug)]
pub struct SessionBenchParams {
    /// Number of rows in the table.
    pub row_count: usize,
}

impl fmt::Display for SessionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.row_count)
    }
}
