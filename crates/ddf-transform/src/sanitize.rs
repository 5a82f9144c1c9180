//! Row sanitization policy applied before reshape.
//!
//! Sanitation is deliberately forgiving: every finding is recorded as a
//! diagnostic and handled with a documented fallback, never raised. The
//! one exception lives upstream: a table without its fixed key columns
//! never reaches this module.

use std::collections::BTreeSet;

use ddf_ingest::CsvTable;
use ddf_model::{Diagnostic, DiagnosticKind, NOT_SPECIFIED, SourceSchema};
use tracing::warn;

/// A source table after sanitation, with the diagnostics recorded along
/// the way.
#[derive(Debug)]
pub struct SanitizedTable {
    pub table: CsvTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Apply the sanitation policy: indicator-collision filtering, null-key
/// handling, duplicate-key detection.
pub fn sanitize(table: CsvTable, schema: &SourceSchema) -> SanitizedTable {
    let CsvTable { headers, rows } = table;
    let mut diagnostics = Vec::new();
    let rows = filter_indicator_collisions(rows, schema, &mut diagnostics);
    let rows = handle_null_keys(rows, schema, &mut diagnostics);
    detect_duplicate_keys(&rows, schema, &mut diagnostics);
    SanitizedTable {
        table: CsvTable { headers, rows },
        diagnostics,
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// A series shared by multiple goals repeats its facts under several
/// indicator labels. Keep only rows matching the first-encountered label,
/// in original row order.
fn filter_indicator_collisions(
    rows: Vec<Vec<String>>,
    schema: &SourceSchema,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Vec<String>> {
    let Some(indicator_index) = schema.indicator_index else {
        return rows;
    };
    let Some(first) = rows.first() else {
        return rows;
    };
    let kept_label = cell(first, indicator_index).to_string();

    let labels: BTreeSet<&str> = rows
        .iter()
        .map(|row| cell(row, indicator_index))
        .collect();
    if labels.len() <= 1 {
        return rows;
    }

    let before = rows.len();
    let kept: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| cell(row, indicator_index) == kept_label)
        .collect();
    let dropped = before - kept.len();
    warn!(
        kept_label = %kept_label,
        dropped, "table mixes indicator labels, keeping the first-encountered one"
    );
    diagnostics.push(Diagnostic::new(
        DiagnosticKind::IndicatorCollision,
        format!("kept indicator {kept_label:?}, discarded {dropped} rows from other indicators"),
        dropped,
    ));
    kept
}

/// Null-key policy: a missing time period cannot be recovered, so the row
/// is dropped; a missing geography cannot be represented in the
/// integer-typed output column, so the row is dropped too; a missing
/// dimension value is legitimately "not specified" and becomes the
/// sentinel entity.
fn handle_null_keys(
    rows: Vec<Vec<String>>,
    schema: &SourceSchema,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Vec<String>> {
    let mut missing_time = 0usize;
    let mut missing_geo = 0usize;
    let mut substituted = 0usize;

    let mut kept = Vec::with_capacity(rows.len());
    for mut row in rows {
        if cell(&row, schema.time_index).is_empty() {
            missing_time += 1;
            continue;
        }
        if cell(&row, schema.geo_index).is_empty() {
            missing_geo += 1;
            continue;
        }
        for dimension in &schema.dimensions {
            if let Some(value) = row.get_mut(dimension.index)
                && value.is_empty()
            {
                *value = NOT_SPECIFIED.to_string();
                substituted += 1;
            }
        }
        kept.push(row);
    }

    if missing_time > 0 {
        warn!(rows = missing_time, "dropped rows with a missing time period");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MissingTimePeriod,
            format!("dropped {missing_time} rows with a missing time period"),
            missing_time,
        ));
    }
    if missing_geo > 0 {
        warn!(rows = missing_geo, "dropped rows with a missing geography code");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MissingGeography,
            format!("dropped {missing_geo} rows with a missing geography code"),
            missing_geo,
        ));
    }
    if substituted > 0 {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MissingDimensionValue,
            format!("substituted {NOT_SPECIFIED:?} for {substituted} missing dimension cells"),
            substituted,
        ));
    }
    kept
}

/// Duplicate key tuples are counted and logged but deliberately kept; the
/// stable sort downstream leaves them adjacent in the output.
fn detect_duplicate_keys(
    rows: &[Vec<String>],
    schema: &SourceSchema,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let key_indexes = schema.key_indexes();
    let mut seen = BTreeSet::new();
    let mut duplicates = 0usize;
    for row in rows {
        let key: Vec<&str> = key_indexes.iter().map(|index| cell(row, *index)).collect();
        if !seen.insert(key.join("\u{1f}")) {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        warn!(duplicates, "duplicated datapoints");
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::DuplicateKeys,
            format!("{duplicates} rows repeat an existing key tuple"),
            duplicates,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize;
    use ddf_ingest::CsvTable;
    use ddf_model::{DiagnosticKind, NOT_SPECIFIED, SourceSchema};

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    fn schema(headers: &[&str]) -> SourceSchema {
        let headers: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
        SourceSchema::detect(&headers).unwrap()
    }

    const HEADERS: &[&str] = &["GeoAreaCode", "TimePeriod", "[Sex]", "Indicator", "Value"];

    #[test]
    fn keeps_only_first_indicator_in_original_order() {
        let input = table(
            HEADERS,
            &[
                &["4", "2015", "Male", "1.1.1", "1"],
                &["4", "2016", "Male", "1.1.1", "2"],
                &["4", "2015", "Male", "4.2.1", "1"],
            ],
        );
        let sanitized = sanitize(input, &schema(HEADERS));
        let indicators: Vec<&str> = sanitized
            .table
            .rows
            .iter()
            .map(|row| row[3].as_str())
            .collect();
        assert_eq!(indicators, vec!["1.1.1", "1.1.1"]);
        assert_eq!(
            sanitized.table.rows[0][1], "2015",
            "original relative order preserved"
        );
        assert!(
            sanitized
                .diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::IndicatorCollision && d.count == 1)
        );
    }

    #[test]
    fn drops_rows_with_missing_time_period() {
        let input = table(
            HEADERS,
            &[
                &["4", "", "Male", "1.1.1", "1"],
                &["4", "2016", "Male", "1.1.1", "2"],
            ],
        );
        let sanitized = sanitize(input, &schema(HEADERS));
        assert_eq!(sanitized.table.rows.len(), 1);
        assert!(
            sanitized
                .diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::MissingTimePeriod)
        );
    }

    #[test]
    fn substitutes_sentinel_for_missing_dimension_values() {
        let input = table(HEADERS, &[&["4", "2015", "", "1.1.1", "1"]]);
        let sanitized = sanitize(input, &schema(HEADERS));
        assert_eq!(sanitized.table.rows[0][2], NOT_SPECIFIED);
        assert!(
            sanitized
                .diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::MissingDimensionValue)
        );
    }

    #[test]
    fn counts_duplicates_without_removing_them() {
        let input = table(
            HEADERS,
            &[
                &["4", "2015", "Male", "1.1.1", "1"],
                &["4", "2015", "Male", "1.1.1", "2"],
            ],
        );
        let sanitized = sanitize(input, &schema(HEADERS));
        assert_eq!(sanitized.table.rows.len(), 2, "duplicates are kept");
        assert!(
            sanitized
                .diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::DuplicateKeys && d.count == 1)
        );
    }

    #[test]
    fn clean_table_yields_no_diagnostics() {
        let input = table(HEADERS, &[&["4", "2015", "Male", "1.1.1", "1"]]);
        let sanitized = sanitize(input, &schema(HEADERS));
        assert!(sanitized.diagnostics.is_empty());
    }
}
