//! CSV loading for the master profile sheet.
//!
//! The sheet is exported from a spreadsheet with a header row naming each
//! column (`nameJapanese`, `slug`, `importFlag`, ...). Cells are trimmed and
//! empty lines are skipped.

use std::path::Path;

use thiserror::Error;

use crate::types::MasterRow;

#[derive(Debug, Error)]
pub enum MasterCsvError {
    #[error("I/O error reading {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parse error in {path}: {source}")]
    Parse { path: String, source: csv::Error },
}

/// Load the master sheet from disk.
///
/// When `flagged_only` is set, rows without an import flag (or with the
/// flag set to `"0"`) are dropped.
pub fn load_master_csv(path: &Path, flagged_only: bool) -> Result<Vec<MasterRow>, MasterCsvError> {
    let content = std::fs::read_to_string(path).map_err(|e| MasterCsvError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let rows = parse_master_csv(&content).map_err(|e| MasterCsvError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    if flagged_only {
        Ok(filter_flagged(rows))
    } else {
        Ok(rows)
    }
}

/// Parse master sheet CSV content from a string.
pub fn parse_master_csv(content: &str) -> Result<Vec<MasterRow>, csv::Error> {
    // Spreadsheet exports often carry a UTF-8 BOM in front of the header
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    // Empty lines never reach here; rows of empty cells are kept so the
    // importer can count and report them
    reader.deserialize::<MasterRow>().collect()
}

/// Keep only rows marked for import.
pub fn filter_flagged(rows: Vec<MasterRow>) -> Vec<MasterRow> {
    let total = rows.len();
    let kept: Vec<_> = rows.into_iter().filter(MasterRow::is_flagged).collect();
    log::debug!("Import flag filter kept {}/{} rows", kept.len(), total);
    kept
}
