//! Unit tests for session construction and detail resolution.

use rstest::{fixture, rstest};

use crate::{
    ClusterData, DendroBuilder, DendroConfig, DendroError, Dendrogram, Details, Linkage, NodeId,
    SparseTable,
    test_utils::{ArenaNode, ArenaTree, dense_column, sparse_abc, three_leaf_tree},
};

use super::Session;

fn config_with_limit(limit: i64) -> DendroConfig {
    DendroBuilder::new()
        .with_sparse_detail_limit(limit)
        .build()
        .expect("limit is valid")
}

/// Rows 0 and 1 share the local centroid `{1: 3, 2: 1, 3: 5}`; with row 2
/// the global centroid becomes `{1: 2, 2: 1, 3: 4}`.
#[fixture]
fn deviation_table() -> SparseTable {
    SparseTable::new(
        vec!["w".into(), "x".into(), "y".into(), "z".into()],
        vec![
            vec![(1, 3.0), (2, 1.0), (3, 5.0)],
            vec![(1, 3.0), (2, 1.0), (3, 5.0)],
            vec![(2, 1.0), (3, 2.0)],
        ],
    )
    .expect("valid table")
}

#[rstest]
fn sparse_details_rank_columns_and_report_deviation(deviation_table: SparseTable) {
    let session = Session::open(
        three_leaf_tree(),
        ClusterData::Sparse(deviation_table),
        &config_with_limit(2),
    )
    .expect("session opens");

    // Post-order: rows 0 and 1 get ids 0 and 1; their merge gets id 2.
    let Details::Sparse(details) = session.resolve(NodeId::new(2)) else {
        panic!("sparse data must resolve to sparse details");
    };
    assert_eq!(details.available, 3);
    let summary: Vec<(usize, &str, f64, f64)> = details
        .rows
        .iter()
        .map(|row| (row.column, row.label.as_str(), row.weight, row.deviation))
        .collect();
    assert_eq!(summary, vec![(3, "z", 5.0, 1.0), (1, "x", 3.0, 1.0)]);
    assert!(details.rows.iter().all(|row| row.global_label == row.label));
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(3, 3)]
#[case(50, 3)]
fn sparse_detail_rows_are_bounded_by_limit(
    deviation_table: SparseTable,
    #[case] limit: i64,
    #[case] expected: usize,
) {
    let session = Session::open(
        three_leaf_tree(),
        ClusterData::Sparse(deviation_table),
        &config_with_limit(limit),
    )
    .expect("session opens");
    let Details::Sparse(details) = session.resolve(session.root()) else {
        panic!("sparse data must resolve to sparse details");
    };
    assert_eq!(details.rows.len(), expected);
}

#[rstest]
fn root_deviation_is_zero(deviation_table: SparseTable) {
    let session = Session::open(
        three_leaf_tree(),
        ClusterData::Sparse(deviation_table),
        &DendroConfig::default(),
    )
    .expect("session opens");
    let Details::Sparse(details) = session.resolve(session.root()) else {
        panic!("sparse data must resolve to sparse details");
    };
    assert!(details.rows.iter().all(|row| row.deviation == 0.0));
    assert_eq!(session.centroid().len(), 3);
}

#[rstest]
fn dense_details_list_member_rows_in_leaf_order() {
    let session = Session::open(
        three_leaf_tree(),
        ClusterData::Dense(dense_column(&["a", "?", "c"])),
        &DendroConfig::default(),
    )
    .expect("session opens");

    let Details::Dense(details) = session.resolve(NodeId::new(2)) else {
        panic!("dense data must resolve to dense details");
    };
    assert_eq!(details.columns, vec!["x".to_owned()]);
    assert_eq!(details.rows, vec![vec!["a".to_owned()], vec![String::new()]]);

    let Details::Dense(leaf) = session.resolve(NodeId::new(3)) else {
        panic!("dense data must resolve to dense details");
    };
    assert_eq!(leaf.rows, vec![vec!["c".to_owned()]]);
    assert!(session.centroid().is_empty());
}

#[rstest]
#[case(5)]
#[case(u64::MAX)]
fn unknown_ids_resolve_to_not_found(#[case] raw: u64) {
    let session = Session::open(
        three_leaf_tree(),
        ClusterData::Dense(dense_column(&["1", "2", "3"])),
        &DendroConfig::default(),
    )
    .expect("session opens");
    let id = NodeId::new(raw);
    assert_eq!(session.resolve(id), Details::NotFound(id));
}

#[rstest]
fn ranked_stream_starts_at_root() {
    let session = Session::open(
        three_leaf_tree(),
        ClusterData::Dense(dense_column(&["1", "2", "3"])),
        &DendroConfig::default(),
    )
    .expect("session opens");
    let ids: Vec<u64> = session.ranked().map(|record| record.id().get()).collect();
    assert_eq!(ids, vec![4, 2, 0, 1, 3]);
    assert_eq!(session.len(), 5);
    assert_eq!(session.root(), NodeId::new(4));
}

#[rstest]
fn leaf_without_row_is_rejected() {
    let tree = ArenaTree {
        root: 2,
        nodes: vec![
            ArenaNode::leaf(0),
            ArenaNode {
                children: None,
                distance: 0.0,
                row: None,
            },
            ArenaNode::merge(0, 1, 1.0),
        ],
    };
    let err = Session::open(
        tree,
        ClusterData::Dense(dense_column(&["1", "2"])),
        &DendroConfig::default(),
    )
    .expect_err("leaf without a row must fail");
    assert_eq!(err, DendroError::MissingLeafRow { id: NodeId::new(1) });
}

#[rstest]
fn leaf_row_past_table_end_is_rejected() {
    let err = Session::open(
        three_leaf_tree(),
        ClusterData::Dense(dense_column(&["1", "2"])),
        &DendroConfig::default(),
    )
    .expect_err("row 2 is out of bounds");
    assert_eq!(
        err,
        DendroError::LeafRowOutOfBounds {
            id: NodeId::new(3),
            row: 2,
            rows: 2,
        }
    );
}

#[rstest]
fn cluster_builds_tree_with_configured_linkage() {
    let config = DendroBuilder::new()
        .with_linkage(Linkage::Complete)
        .build()
        .expect("valid config");
    let data = ClusterData::Sparse(sparse_abc(vec![
        vec![(0, 1.0)],
        vec![(0, 1.0), (2, 1.0)],
        vec![(1, 7.0)],
    ]));
    let session = Session::cluster(data, &config).expect("session opens");
    let expected = Dendrogram::build(session.data(), Linkage::Complete).expect("tree builds");
    assert_eq!(session.tree(), &expected);
    assert_eq!(session.registry().len(), 5);
}

#[rstest]
fn cluster_accepts_large_finite_coordinates() {
    let data = ClusterData::Dense(dense_column(&["1e200", "-1e200", "0"]));
    let session = Session::cluster(data, &DendroConfig::default()).expect("session opens");
    let root = session.ranked().next().expect("tree has a root");
    assert_eq!(root.id(), session.root());
    assert!(root.child_distance().is_finite());
    assert!(root.child_distance() > 1e200);
}

#[rstest]
fn cluster_reports_distance_overflow_instead_of_a_bad_node() {
    let data = ClusterData::Dense(dense_column(&["1.7e308", "-1.7e308"]));
    let err = Session::cluster(data, &DendroConfig::default()).expect_err("distance overflows");
    assert_eq!(err, DendroError::DistanceOverflow { left: 0, right: 1 });
}

#[rstest]
fn sessions_are_shareable_across_threads(deviation_table: SparseTable) {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let session = Session::open(
        three_leaf_tree(),
        ClusterData::Sparse(deviation_table),
        &DendroConfig::default(),
    )
    .expect("session opens");
    assert_send_sync(&session);

    let expected: Vec<Details> = (0..6).map(|raw| session.resolve(NodeId::new(raw))).collect();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..6)
                        .map(|raw| session.resolve(NodeId::new(raw)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("worker completes"), expected);
        }
    });
}
