//! Delimited-text providers producing dendro tables.
//!
//! [`DenseTextProvider`] reads a header line followed by delimited rows of
//! string cells. [`SparseTextProvider`] reads a tab-separated header followed
//! by rows of whitespace-separated `column:weight` tokens.

mod dense;
mod errors;
mod lines;
mod sparse;

pub use dense::{DEFAULT_DELIMITER, DenseTextProvider};
pub use errors::{ProviderError, ProviderErrorCode};
pub use sparse::SparseTextProvider;
