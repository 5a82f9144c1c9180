use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// An in-memory source table: trimmed headers plus row-major cells.
///
/// Every row is padded or truncated to the header width, so cell access by
/// column index is always in bounds.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// True when the file carried no header row or no data rows.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read one source table.
///
/// Headers and cells are trimmed of surrounding whitespace and BOM
/// markers. Rows whose cells are all empty are skipped. An empty file
/// yields an empty table rather than an error: absent data is a
/// recoverable per-series condition.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader.headers().map_err(csv_error)?.iter().map(normalize_cell).collect();
    if headers.iter().all(|header| header.is_empty()) {
        return Ok(CsvTable::default());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut row = Vec::with_capacity(headers.len());
        for index in 0..headers.len() {
            row.push(normalize_cell(record.get(index).unwrap_or("")));
        }
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}
