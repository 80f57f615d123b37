//! Provider error type and its stable codes.
//!
//! Parse failures carry the one-based line they were found on so a user can
//! locate the offending row in the input file.

use std::{fmt, io};

use dendro_core::TableError;
use thiserror::Error;

/// Errors raised while reading a table from text.
///
/// Line numbers are one-based and count every physical line, blank lines
/// included.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The input contained no header line.
    #[error("input contains no header line")]
    EmptyInput,
    /// A dense row did not have one cell per header column.
    #[error("line {line} has {actual} cells but the header has {expected}")]
    WidthMismatch {
        /// Offending line.
        line: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells on the line.
        actual: usize,
    },
    /// A sparse token was not of the form `column:weight`.
    #[error("line {line}: malformed token `{token}`, expected `column:weight`")]
    BadToken {
        /// Offending line.
        line: usize,
        /// The malformed token.
        token: String,
    },
    /// A sparse token named a column missing from the header.
    #[error("line {line}: unknown column `{column}`")]
    UnknownColumn {
        /// Offending line.
        line: usize,
        /// Column index or label as written.
        column: String,
    },
    /// A sparse row listed the same column twice.
    #[error("line {line}: column `{column}` appears more than once")]
    DuplicateColumn {
        /// Offending line.
        line: usize,
        /// Label of the repeated column.
        column: String,
    },
    /// The parsed rows failed table validation.
    #[error(transparent)]
    Table(#[from] TableError),
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Stable codes describing [`ProviderError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ProviderErrorCode {
    /// The input contained no header line.
    EmptyInput,
    /// A dense row had the wrong number of cells.
    WidthMismatch,
    /// A sparse token was malformed.
    BadToken,
    /// A sparse token named an unknown column.
    UnknownColumn,
    /// A sparse row repeated a column.
    DuplicateColumn,
    /// Table validation failed.
    TableFailure,
    /// Reading the input failed.
    Io,
}

impl ProviderErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyInput => "PROVIDER_EMPTY_INPUT",
            Self::WidthMismatch => "PROVIDER_WIDTH_MISMATCH",
            Self::BadToken => "PROVIDER_BAD_TOKEN",
            Self::UnknownColumn => "PROVIDER_UNKNOWN_COLUMN",
            Self::DuplicateColumn => "PROVIDER_DUPLICATE_COLUMN",
            Self::TableFailure => "PROVIDER_TABLE_FAILURE",
            Self::Io => "PROVIDER_IO",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderError {
    /// Retrieve the stable [`ProviderErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ProviderErrorCode {
        match self {
            Self::EmptyInput => ProviderErrorCode::EmptyInput,
            Self::WidthMismatch { .. } => ProviderErrorCode::WidthMismatch,
            Self::BadToken { .. } => ProviderErrorCode::BadToken,
            Self::UnknownColumn { .. } => ProviderErrorCode::UnknownColumn,
            Self::DuplicateColumn { .. } => ProviderErrorCode::DuplicateColumn,
            Self::Table(_) => ProviderErrorCode::TableFailure,
            Self::Io(_) => ProviderErrorCode::Io,
        }
    }
}
