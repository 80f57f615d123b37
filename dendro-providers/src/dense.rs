//! Dense delimited-text provider.

use std::io::BufRead;

use dendro_core::{ClusterData, DenseTable};
use tracing::debug;

use crate::{errors::ProviderError, lines::read_numbered};

/// Delimiter used when none is supplied.
pub const DEFAULT_DELIMITER: char = '\t';

/// Dense table read from delimited text.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use dendro_providers::DenseTextProvider;
///
/// let provider = DenseTextProvider::try_from_reader("demo", Cursor::new("x,y\n1,2\n3,?\n"), ',')?;
/// assert_eq!(provider.name(), "demo");
/// assert_eq!(provider.table().len(), 2);
/// assert_eq!(provider.table().numeric_value(1, 1), None);
/// # Ok::<(), dendro_providers::ProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DenseTextProvider {
    name: String,
    table: DenseTable,
}

impl DenseTextProvider {
    /// Reads a header line followed by rows split on `delimiter`.
    ///
    /// Cells are trimmed of surrounding whitespace and blank lines are
    /// skipped.
    ///
    /// # Errors
    /// Returns [`ProviderError::EmptyInput`] when there is no header,
    /// [`ProviderError::WidthMismatch`] when a row has the wrong number of
    /// cells, and [`ProviderError::Io`] when reading fails.
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
        delimiter: char,
    ) -> Result<Self, ProviderError> {
        let lines = read_numbered(reader)?;
        let columns = split_cells(&lines.header, delimiter);
        let mut rows = Vec::with_capacity(lines.rows.len());
        for (line, text) in &lines.rows {
            let cells = split_cells(text, delimiter);
            if cells.len() != columns.len() {
                return Err(ProviderError::WidthMismatch {
                    line: *line,
                    expected: columns.len(),
                    actual: cells.len(),
                });
            }
            rows.push(cells);
        }
        let name = name.into();
        debug!(name = %name, rows = rows.len(), columns = columns.len(), "dense table loaded");
        let table = DenseTable::new(columns, rows)?;
        Ok(Self { name, table })
    }

    /// Returns the provider name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parsed table.
    #[must_use]
    pub const fn table(&self) -> &DenseTable {
        &self.table
    }

    /// Consumes the provider and returns its table as cluster data.
    #[must_use]
    pub fn into_data(self) -> ClusterData {
        ClusterData::Dense(self.table)
    }
}

fn split_cells(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|cell| cell.trim().to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use dendro_test_support::fixtures::{DENSE_CSV_WITH_MISSING, DENSE_RAGGED_TSV, DENSE_TSV};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn reads_tab_delimited_rows() {
        let provider = DenseTextProvider::try_from_reader("demo", Cursor::new(DENSE_TSV), '\t')
            .expect("provider must build");
        let table = provider.table();
        assert_eq!(table.columns(), ["x", "y"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.numeric_value(2, 0), Some(10.0));
    }

    #[rstest]
    fn keeps_missing_markers_verbatim() {
        let provider =
            DenseTextProvider::try_from_reader("demo", Cursor::new(DENSE_CSV_WITH_MISSING), ',')
                .expect("provider must build");
        let row = provider.table().row(1).expect("row exists");
        assert_eq!(row, ["beta", "?"]);
    }

    #[rstest]
    fn skips_blank_lines_and_carriage_returns() {
        let raw = "\r\na\tb\r\n\r\n1\t2\r\n\n3\t4\r\n";
        let provider = DenseTextProvider::try_from_reader("demo", Cursor::new(raw), '\t')
            .expect("provider must build");
        assert_eq!(provider.table().len(), 2);
        assert_eq!(provider.table().row(1), Some(&["3".to_owned(), "4".to_owned()][..]));
    }

    #[rstest]
    fn reports_width_mismatch_with_line_number() {
        let err = DenseTextProvider::try_from_reader("demo", Cursor::new(DENSE_RAGGED_TSV), '\t')
            .expect_err("ragged rows must fail");
        assert!(matches!(
            err,
            ProviderError::WidthMismatch {
                line: 3,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[rstest]
    #[case("")]
    #[case("\n\n  \n")]
    fn rejects_input_without_header(#[case] raw: &str) {
        let err = DenseTextProvider::try_from_reader("demo", Cursor::new(raw), '\t')
            .expect_err("empty input must fail");
        assert!(matches!(err, ProviderError::EmptyInput));
    }

    #[rstest]
    fn header_only_input_yields_empty_table() {
        let provider = DenseTextProvider::try_from_reader("demo", Cursor::new("x\ty\n"), '\t')
            .expect("provider must build");
        assert!(provider.table().is_empty());
        assert!(provider.into_data().is_empty());
    }
}
