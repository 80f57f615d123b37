//! Benchmark support crate for dendro.
//!
//! Provides seeded synthetic tables and parameter types used by the Criterion
//! benchmarks for tree construction, flattening, ranking, and detail
//! resolution.

pub mod error;
pub mod params;
pub mod source;
