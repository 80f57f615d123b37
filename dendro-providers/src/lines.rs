//! Line splitting shared by the text providers.

use std::io::BufRead;

use crate::errors::ProviderError;

/// Header plus the numbered, non-blank data lines of a text table.
pub(crate) struct NumberedLines {
    pub(crate) header: String,
    pub(crate) rows: Vec<(usize, String)>,
}

/// Reads every line, trimming `\r\n` endings.
///
/// Leading blank lines before the header and blank data lines are skipped;
/// the returned line numbers are one-based positions in the input.
pub(crate) fn read_numbered<R: BufRead>(reader: R) -> Result<NumberedLines, ProviderError> {
    let mut header = None;
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() {
            continue;
        }
        if header.is_none() {
            header = Some(trimmed.to_owned());
        } else {
            rows.push((index + 1, trimmed.to_owned()));
        }
    }
    let header = header.ok_or(ProviderError::EmptyInput)?;
    Ok(NumberedLines { header, rows })
}
