//! Sparse `column:weight` text provider.

use std::collections::HashMap;
use std::io::BufRead;

use dendro_core::{ClusterData, SparseTable};
use tracing::debug;

use crate::{errors::ProviderError, lines::read_numbered};

/// Sparse table read from `column:weight` tokens.
///
/// The header is a tab-separated list of column labels. Each later line is
/// one row; a token's column is either a zero-based header index or a header
/// label.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use dendro_providers::SparseTextProvider;
///
/// let raw = "red\tgreen\n0:2 green:1\n1:4\n";
/// let provider = SparseTextProvider::try_from_reader("demo", Cursor::new(raw))?;
/// assert_eq!(provider.table().row(0), Some(&[(0, 2.0), (1, 1.0)][..]));
/// assert_eq!(provider.table().row(1), Some(&[(1, 4.0)][..]));
/// # Ok::<(), dendro_providers::ProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SparseTextProvider {
    name: String,
    table: SparseTable,
}

impl SparseTextProvider {
    /// Reads a sparse table from `reader`.
    ///
    /// Blank lines are skipped. Entries of each row are sorted by column.
    ///
    /// # Errors
    /// Returns [`ProviderError::EmptyInput`] when there is no header,
    /// [`ProviderError::BadToken`] for tokens that are not `column:weight`,
    /// [`ProviderError::UnknownColumn`] for columns missing from the header,
    /// [`ProviderError::DuplicateColumn`] when a row repeats a column, and
    /// [`ProviderError::Table`] when a weight is not finite.
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, ProviderError> {
        let lines = read_numbered(reader)?;
        let columns: Vec<String> = lines
            .header
            .split('\t')
            .map(|label| label.trim().to_owned())
            .collect();
        let labels: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(index, label)| (label.as_str(), index))
            .collect();

        let mut rows = Vec::with_capacity(lines.rows.len());
        for (line, text) in &lines.rows {
            rows.push(parse_row(*line, text, &columns, &labels)?);
        }
        let name = name.into();
        debug!(name = %name, rows = rows.len(), columns = columns.len(), "sparse table loaded");
        let table = SparseTable::new(columns, rows)?;
        Ok(Self { name, table })
    }

    /// Returns the provider name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parsed table.
    #[must_use]
    pub const fn table(&self) -> &SparseTable {
        &self.table
    }

    /// Consumes the provider and returns its table as cluster data.
    #[must_use]
    pub fn into_data(self) -> ClusterData {
        ClusterData::Sparse(self.table)
    }
}

fn parse_row(
    line: usize,
    text: &str,
    columns: &[String],
    labels: &HashMap<&str, usize>,
) -> Result<Vec<(usize, f64)>, ProviderError> {
    let mut entries: Vec<(usize, f64)> = Vec::new();
    for token in text.split_whitespace() {
        let bad_token = || ProviderError::BadToken {
            line,
            token: token.to_owned(),
        };
        let (column, weight) = token.rsplit_once(':').ok_or_else(bad_token)?;
        let weight: f64 = weight.parse().map_err(|_| bad_token())?;
        let index = resolve_column(column, columns.len(), labels).ok_or_else(|| {
            ProviderError::UnknownColumn {
                line,
                column: column.to_owned(),
            }
        })?;
        entries.push((index, weight));
    }
    entries.sort_by_key(|&(column, _)| column);
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        let column = columns.get(pair[0].0).cloned().unwrap_or_default();
        return Err(ProviderError::DuplicateColumn { line, column });
    }
    Ok(entries)
}

fn resolve_column(raw: &str, width: usize, labels: &HashMap<&str, usize>) -> Option<usize> {
    labels.get(raw).copied().or_else(|| {
        raw.parse::<usize>()
            .ok()
            .filter(|&index| index < width)
    })
}
