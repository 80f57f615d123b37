//! Dendro core library.
//!
//! Flattens binary cluster trees into identifier-indexed records, streams
//! them in rank order, and resolves per-node details on demand.

mod builder;
mod centroid;
mod detail;
mod error;
mod flatten;
mod linkage;
mod rank;
mod record;
mod session;
mod table;
mod tree;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DendroBuilder, DendroConfig},
    centroid::{CentroidEntry, CentroidIndex},
    detail::{
        DEFAULT_SPARSE_DETAIL_LIMIT, DenseDetails, DetailResolver, Details, SparseDetailRow,
        SparseDetails,
    },
    error::{DendroError, DendroErrorCode, Result, TableError, TableErrorCode},
    flatten::{Flattened, NodeRegistry, flatten},
    linkage::{Dendrogram, Linkage},
    rank::{RankKey, Ranked, rank},
    record::{NodeId, NodeRecord},
    session::{Session, SessionGate, SessionPermit},
    table::{ClusterData, DenseTable, MISSING_VALUE, SparseCentroid, SparseTable},
    tree::ClusterTree,
};
