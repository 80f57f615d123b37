//! Shared test utilities used across dendro crates.

pub mod fixtures;
pub mod proptest_profile;
pub mod tracing;
