//! Integration tests reading provider inputs from disk.

use std::fs::File;
use std::io::{BufReader, Write};

use dendro_core::ClusterData;
use dendro_providers::{
    DEFAULT_DELIMITER, DenseTextProvider, ProviderError, ProviderErrorCode, SparseTextProvider,
};
use dendro_test_support::fixtures::{DENSE_RAGGED_TSV, DENSE_TSV, SPARSE_TSV};
use rstest::rstest;
use tempfile::NamedTempFile;

fn write_fixture(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file must be created");
    file.write_all(contents.as_bytes())
        .expect("fixture must be written");
    file
}

fn open(file: &NamedTempFile) -> BufReader<File> {
    BufReader::new(File::open(file.path()).expect("fixture must open"))
}

#[rstest]
fn dense_file_loads_into_cluster_data() {
    let file = write_fixture(DENSE_TSV);
    let provider = DenseTextProvider::try_from_reader("points", open(&file), DEFAULT_DELIMITER)
        .expect("provider must build");
    assert_eq!(provider.name(), "points");
    let data = provider.into_data();
    assert!(matches!(data, ClusterData::Dense(_)));
    assert_eq!(data.len(), 3);
}

#[rstest]
fn sparse_file_loads_into_cluster_data() {
    let file = write_fixture(SPARSE_TSV);
    let data = SparseTextProvider::try_from_reader("terms", open(&file))
        .expect("provider must build")
        .into_data();
    assert_eq!(data.kind(), "sparse");
    assert_eq!(data.len(), 3);
}

#[rstest]
fn ragged_dense_file_reports_code() {
    let file = write_fixture(DENSE_RAGGED_TSV);
    let err = DenseTextProvider::try_from_reader("ragged", open(&file), DEFAULT_DELIMITER)
        .expect_err("ragged file must fail");
    assert_eq!(err.code(), ProviderErrorCode::WidthMismatch);
    assert_eq!(err.to_string(), "line 3 has 1 cells but the header has 2");
}

#[rstest]
#[case(ProviderError::EmptyInput, "PROVIDER_EMPTY_INPUT")]
#[case(
    ProviderError::BadToken { line: 1, token: "x".into() },
    "PROVIDER_BAD_TOKEN",
)]
#[case(
    ProviderError::UnknownColumn { line: 1, column: "x".into() },
    "PROVIDER_UNKNOWN_COLUMN",
)]
#[case(
    ProviderError::DuplicateColumn { line: 1, column: "x".into() },
    "PROVIDER_DUPLICATE_COLUMN",
)]
#[case(
    ProviderError::Io(std::io::Error::other("boom")),
    "PROVIDER_IO",
)]
fn codes_are_stable(#[case] error: ProviderError, #[case] expected: &str) {
    assert_eq!(error.code().as_str(), expected);
    assert_eq!(error.code().to_string(), expected);
}
