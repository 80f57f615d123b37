use dendro_core::{
    DendroBuilder, DendroError, DendroErrorCode, NodeId, TableError, TableErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(
    TableError::RowWidthMismatch { row: 1, expected: 2, actual: 1 },
    TableErrorCode::RowWidthMismatch,
    "TABLE_ROW_WIDTH_MISMATCH",
)]
#[case(
    TableError::ColumnOutOfBounds { row: 0, column: 4, columns: 2 },
    TableErrorCode::ColumnOutOfBounds,
    "TABLE_COLUMN_OUT_OF_BOUNDS",
)]
#[case(
    TableError::UnorderedColumns { row: 0, column: 1 },
    TableErrorCode::UnorderedColumns,
    "TABLE_UNORDERED_COLUMNS",
)]
#[case(
    TableError::NonFiniteWeight { row: 2, column: 0, weight: f64::NAN },
    TableErrorCode::NonFiniteWeight,
    "TABLE_NON_FINITE_WEIGHT",
)]
fn returns_expected_table_code(
    #[case] error: TableError,
    #[case] expected: TableErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
    assert_eq!(expected.to_string(), text);
}

#[rstest]
#[case(
    DendroError::InvalidDetailLimit { got: -3 },
    DendroErrorCode::InvalidDetailLimit,
    None,
)]
#[case(DendroError::EmptyTable, DendroErrorCode::EmptyTable, None)]
#[case(
    DendroError::MalformedTree { node: "7".into() },
    DendroErrorCode::MalformedTree,
    None,
)]
#[case(
    DendroError::InvalidDistance { id: NodeId::new(2), distance: f64::INFINITY },
    DendroErrorCode::InvalidDistance,
    None,
)]
#[case(
    DendroError::MissingLeafRow { id: NodeId::new(0) },
    DendroErrorCode::MissingLeafRow,
    None,
)]
#[case(
    DendroError::LeafRowOutOfBounds { id: NodeId::new(0), row: 9, rows: 3 },
    DendroErrorCode::LeafRowOutOfBounds,
    None,
)]
#[case(
    DendroError::InvalidMerge { step: 0, node: 5 },
    DendroErrorCode::InvalidMerge,
    None,
)]
#[case(
    DendroError::Disconnected { roots: 2 },
    DendroErrorCode::Disconnected,
    None,
)]
#[case(
    DendroError::DistanceOverflow { left: 0, right: 1 },
    DendroErrorCode::DistanceOverflow,
    None,
)]
#[case(
    DendroError::from(TableError::UnorderedColumns { row: 0, column: 1 }),
    DendroErrorCode::TableFailure,
    Some(TableErrorCode::UnorderedColumns),
)]
fn returns_expected_dendro_code(
    #[case] error: DendroError,
    #[case] expected: DendroErrorCode,
    #[case] table_code: Option<TableErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
    assert_eq!(error.table_code(), table_code);
}

#[rstest]
fn invalid_limit_message_names_the_value() {
    let err = DendroBuilder::new()
        .with_sparse_detail_limit(-4)
        .build()
        .expect_err("negative limits are invalid");
    assert_eq!(err.code().as_str(), "DENDRO_INVALID_DETAIL_LIMIT");
    assert_eq!(err.to_string(), "sparse_detail_limit must be at least 0 (got -4)");
}

#[rstest]
fn table_errors_are_transparent() {
    let err = DendroError::from(TableError::ColumnOutOfBounds {
        row: 0,
        column: 4,
        columns: 2,
    });
    assert_eq!(
        err.to_string(),
        "row 0 references column 4 but the table has 2 columns"
    );
}
