//! Error types for the dendro core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::record::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while validating a [`crate::DenseTable`] or
/// [`crate::SparseTable`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TableError {
    /// A dense row did not have one cell per column.
    #[error("row {row} has {actual} cells but the table has {expected} columns")]
    RowWidthMismatch {
        /// Index of the offending row.
        row: usize,
        /// Number of columns in the header.
        expected: usize,
        /// Number of cells found in the row.
        actual: usize,
    },
    /// A sparse entry referenced a column outside the header.
    #[error("row {row} references column {column} but the table has {columns} columns")]
    ColumnOutOfBounds {
        /// Index of the offending row.
        row: usize,
        /// Column index referenced by the entry.
        column: usize,
        /// Number of columns in the header.
        columns: usize,
    },
    /// Sparse entries within a row must be strictly increasing by column.
    #[error("row {row} lists column {column} out of order or more than once")]
    UnorderedColumns {
        /// Index of the offending row.
        row: usize,
        /// Column at which the ordering was violated.
        column: usize,
    },
    /// A sparse weight was NaN or infinite.
    #[error("row {row} has non-finite weight {weight} for column {column}")]
    NonFiniteWeight {
        /// Index of the offending row.
        row: usize,
        /// Column holding the weight.
        column: usize,
        /// Offending weight.
        weight: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`TableError`] variants.
    enum TableErrorCode for TableError {
        /// A dense row did not have one cell per column.
        RowWidthMismatch => RowWidthMismatch { .. } => "TABLE_ROW_WIDTH_MISMATCH",
        /// A sparse entry referenced a column outside the header.
        ColumnOutOfBounds => ColumnOutOfBounds { .. } => "TABLE_COLUMN_OUT_OF_BOUNDS",
        /// Sparse entries were not strictly increasing by column.
        UnorderedColumns => UnorderedColumns { .. } => "TABLE_UNORDERED_COLUMNS",
        /// A sparse weight was NaN or infinite.
        NonFiniteWeight => NonFiniteWeight { .. } => "TABLE_NON_FINITE_WEIGHT",
    }
}

/// Error type produced when configuring, building, or opening a dendrogram
/// session.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DendroError {
    /// The sparse detail limit must not be negative.
    #[error("sparse_detail_limit must be at least 0 (got {got})")]
    InvalidDetailLimit {
        /// The rejected limit.
        got: i64,
    },
    /// A tree cannot be built from a table without rows.
    #[error("cannot build a cluster tree from an empty table")]
    EmptyTable,
    /// The cluster tree reached the same node twice, so it is not a tree.
    #[error("cluster tree node {node} was reached more than once; shared subtrees and cycles are not supported")]
    MalformedTree {
        /// Debug rendering of the offending tree node handle.
        node: String,
    },
    /// A node carried a NaN or infinite child distance.
    #[error("node {id} has non-finite child distance {distance}")]
    InvalidDistance {
        /// Identifier assigned to the offending node.
        id: NodeId,
        /// The rejected distance.
        distance: f64,
    },
    /// A leaf did not reference a data row.
    #[error("leaf {id} does not reference a data row")]
    MissingLeafRow {
        /// Identifier assigned to the offending leaf.
        id: NodeId,
    },
    /// A leaf referenced a row outside the table.
    #[error("leaf {id} references row {row} but the table has {rows} rows")]
    LeafRowOutOfBounds {
        /// Identifier assigned to the offending leaf.
        id: NodeId,
        /// Row referenced by the leaf.
        row: usize,
        /// Number of rows in the table.
        rows: usize,
    },
    /// A merge step referenced a node that does not exist or was already
    /// merged.
    #[error("merge step {step} references unavailable node {node}")]
    InvalidMerge {
        /// Zero-based index of the offending merge.
        step: usize,
        /// Node referenced by the merge.
        node: usize,
    },
    /// The merges left more than one root.
    #[error("merges leave {roots} disconnected roots; expected exactly one")]
    Disconnected {
        /// Number of roots remaining after all merges.
        roots: usize,
    },
    /// Two clusters are farther apart than an `f64` can represent.
    #[error("distance between clusters {left} and {right} exceeds the representable range")]
    DistanceOverflow {
        /// Dendrogram node of the first cluster.
        left: usize,
        /// Dendrogram node of the second cluster.
        right: usize,
    },
    /// Table validation failed.
    #[error(transparent)]
    Table(#[from] TableError),
}

define_error_codes! {
    /// Stable codes describing [`DendroError`] variants.
    enum DendroErrorCode for DendroError {
        /// The sparse detail limit must not be negative.
        InvalidDetailLimit => InvalidDetailLimit { .. } => "DENDRO_INVALID_DETAIL_LIMIT",
        /// A tree cannot be built from a table without rows.
        EmptyTable => EmptyTable => "DENDRO_EMPTY_TABLE",
        /// The cluster tree reached the same node twice.
        MalformedTree => MalformedTree { .. } => "DENDRO_MALFORMED_TREE",
        /// A node carried a NaN or infinite child distance.
        InvalidDistance => InvalidDistance { .. } => "DENDRO_INVALID_DISTANCE",
        /// A leaf did not reference a data row.
        MissingLeafRow => MissingLeafRow { .. } => "DENDRO_MISSING_LEAF_ROW",
        /// A leaf referenced a row outside the table.
        LeafRowOutOfBounds => LeafRowOutOfBounds { .. } => "DENDRO_LEAF_ROW_OUT_OF_BOUNDS",
        /// A merge step referenced an unavailable node.
        InvalidMerge => InvalidMerge { .. } => "DENDRO_INVALID_MERGE",
        /// The merges left more than one root.
        Disconnected => Disconnected { .. } => "DENDRO_DISCONNECTED",
        /// Two clusters are farther apart than an `f64` can represent.
        DistanceOverflow => DistanceOverflow { .. } => "DENDRO_DISTANCE_OVERFLOW",
        /// Table validation failed.
        TableFailure => Table(..) => "DENDRO_TABLE_FAILURE",
    }
}

impl DendroError {
    /// Retrieve the inner [`TableErrorCode`] when the error originated in
    /// table validation.
    #[must_use]
    pub const fn table_code(&self) -> Option<TableErrorCode> {
        match self {
            Self::Table(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DendroError>;
