//! Long-form datapoint table construction.
//!
//! A sanitized source table is projected onto its key columns plus the
//! value, renamed to normalized identifiers, typed, formatted, and sorted.
//! Output columns follow the alphabetically-sorted identifier list rather
//! than source order, so a file is self-describing from its name alone and
//! two measures sharing a key set are byte-for-byte mergeable downstream.

use ddf_ingest::CsvTable;
use ddf_model::{
    ConceptId, Diagnostic, DiagnosticKind, GEO_AREA_CONCEPT, ModelError, SourceSchema,
    YEAR_CONCEPT,
};
use tracing::warn;

use crate::numeric::{VALUE_SIGNIFICANT_DIGITS, format_significant, parse_integer, parse_value};

/// A typed key cell. Geography and year sort numerically, dimension
/// identifiers lexicographically; within one column every row carries the
/// same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyValue {
    Int(i64),
    Id(ConceptId),
}

impl KeyValue {
    fn render(&self) -> String {
        match self {
            KeyValue::Int(value) => value.to_string(),
            KeyValue::Id(id) => id.as_str().to_string(),
        }
    }
}

/// A reshaped, formatted, sorted datapoint table for one measure.
#[derive(Debug)]
pub struct DatapointTable {
    pub measure: ConceptId,
    /// Key column identifiers in output order (alphabetical).
    pub key_columns: Vec<ConceptId>,
    /// Rendered rows: key cells in `key_columns` order, value last.
    pub rows: Vec<Vec<String>>,
}

impl DatapointTable {
    /// Output filename encoding the measure and its key-column set.
    pub fn file_name(&self) -> String {
        let keys: Vec<&str> = self.key_columns.iter().map(ConceptId::as_str).collect();
        format!("datapoints--{}--by--{}.csv", self.measure, keys.join("--"))
    }
}

struct KeyColumn {
    id: ConceptId,
    index: usize,
    integer: bool,
}

/// Reshape a sanitized table into the long-form datapoint table for
/// `measure`.
pub fn build_datapoints(
    table: &CsvTable,
    schema: &SourceSchema,
    measure: &ConceptId,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<DatapointTable, ModelError> {
    let mut key_columns = Vec::with_capacity(2 + schema.dimensions.len());
    key_columns.push(KeyColumn {
        id: ConceptId::new(GEO_AREA_CONCEPT)?,
        index: schema.geo_index,
        integer: true,
    });
    key_columns.push(KeyColumn {
        id: ConceptId::new(YEAR_CONCEPT)?,
        index: schema.time_index,
        integer: true,
    });
    for dimension in &schema.dimensions {
        key_columns.push(KeyColumn {
            id: dimension.id.clone(),
            index: dimension.index,
            integer: false,
        });
    }
    key_columns.sort_by(|a, b| a.id.cmp(&b.id));

    let value_is_numeric = detect_numeric_values(table, schema, measure, diagnostics);

    let mut non_integer_keys = 0usize;
    let mut typed_rows: Vec<(Vec<KeyValue>, String)> = Vec::with_capacity(table.rows.len());
    'rows: for row in &table.rows {
        let raw_value = cell(row, schema.value_index);
        let value = if value_is_numeric {
            match parse_value(raw_value) {
                Some(parsed) => format_significant(parsed, VALUE_SIGNIFICANT_DIGITS),
                None => String::new(),
            }
        } else {
            raw_value.to_string()
        };
        if value.is_empty() {
            continue;
        }

        let mut keys = Vec::with_capacity(key_columns.len());
        for column in &key_columns {
            let raw = cell(row, column.index);
            if column.integer {
                match parse_integer(raw) {
                    Some(parsed) => keys.push(KeyValue::Int(parsed)),
                    None => {
                        non_integer_keys += 1;
                        continue 'rows;
                    }
                }
            } else {
                keys.push(KeyValue::Id(ConceptId::new(raw)?));
            }
        }
        typed_rows.push((keys, value));
    }

    if non_integer_keys > 0 {
        warn!(
            measure = %measure,
            rows = non_integer_keys,
            "dropped rows whose geography or year is not an integer"
        );
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::NonIntegerKey,
            format!("dropped {non_integer_keys} rows whose geography or year is not an integer"),
            non_integer_keys,
        ));
    }

    // Stable sort: duplicate key tuples keep their original order.
    typed_rows.sort_by(|a, b| a.0.cmp(&b.0));

    let rows = typed_rows
        .into_iter()
        .map(|(keys, value)| {
            let mut rendered: Vec<String> = keys.iter().map(KeyValue::render).collect();
            rendered.push(value);
            rendered
        })
        .collect();

    Ok(DatapointTable {
        measure: measure.clone(),
        key_columns: key_columns.into_iter().map(|column| column.id).collect(),
        rows,
    })
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// The value column is numeric iff every non-empty cell parses as f64.
fn detect_numeric_values(
    table: &CsvTable,
    schema: &SourceSchema,
    measure: &ConceptId,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let mut non_empty = 0usize;
    let mut numeric = 0usize;
    for row in &table.rows {
        let raw = cell(row, schema.value_index);
        if raw.is_empty() {
            continue;
        }
        non_empty += 1;
        if parse_value(raw).is_some() {
            numeric += 1;
        }
    }
    let value_is_numeric = non_empty > 0 && numeric == non_empty;
    if !value_is_numeric && non_empty > 0 {
        warn!(
            measure = %measure,
            non_numeric = non_empty - numeric,
            "value column is not numeric, passing values through unformatted"
        );
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::NonNumericValue,
            format!(
                "value column is not numeric ({} of {non_empty} cells), passed through unformatted",
                non_empty - numeric
            ),
            non_empty - numeric,
        ));
    }
    value_is_numeric
}

#[cfg(test)]
mod tests {
    use super::build_datapoints;
    use ddf_ingest::CsvTable;
    use ddf_model::{ConceptId, DiagnosticKind, SourceSchema};

    fn table(headers: &[&str], rows: &[&[&str]]) -> (CsvTable, SourceSchema) {
        let headers: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
        let schema = SourceSchema::detect(&headers).unwrap();
        let table = CsvTable {
            headers,
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        };
        (table, schema)
    }

    fn measure() -> ConceptId {
        ConceptId::new("sl_test_ind").unwrap()
    }

    #[test]
    fn formats_sorts_and_types_rows() {
        let (table, schema) = table(
            &["GeoAreaCode", "TimePeriod", "Value"],
            &[
                &["8", "2016", "2.0"],
                &["4", "2015", "1.23456789"],
            ],
        );
        let mut diagnostics = Vec::new();
        let datapoints = build_datapoints(&table, &schema, &measure(), &mut diagnostics).unwrap();

        assert_eq!(
            datapoints.rows,
            vec![
                vec!["4".to_string(), "2015".to_string(), "1.234568".to_string()],
                vec!["8".to_string(), "2016".to_string(), "2".to_string()],
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn key_columns_and_filename_are_alphabetical() {
        let (table, schema) = table(
            &["GeoAreaCode", "TimePeriod", "[Sex]", "[Age]", "Value"],
            &[&["4", "2015", "Male", "15 to 24", "1"]],
        );
        let mut diagnostics = Vec::new();
        let datapoints = build_datapoints(&table, &schema, &measure(), &mut diagnostics).unwrap();

        let columns: Vec<&str> = datapoints
            .key_columns
            .iter()
            .map(ConceptId::as_str)
            .collect();
        assert_eq!(columns, vec!["age", "geo_area", "sex", "year"]);
        assert_eq!(
            datapoints.file_name(),
            "datapoints--sl_test_ind--by--age--geo_area--sex--year.csv"
        );
        assert_eq!(datapoints.rows[0], vec!["15_to_24", "4", "male", "2015"]
            .into_iter()
            .map(String::from)
            .chain(std::iter::once("1".to_string()))
            .collect::<Vec<_>>());
    }

    #[test]
    fn dimension_cells_become_entity_identifiers() {
        let (table, schema) = table(
            &["GeoAreaCode", "TimePeriod", "[Sex]", "Value"],
            &[&["4", "2015", "Both sexes", "1.5"]],
        );
        let mut diagnostics = Vec::new();
        let datapoints = build_datapoints(&table, &schema, &measure(), &mut diagnostics).unwrap();
        // Columns: geo_area, sex, year, value.
        assert_eq!(datapoints.rows[0][1], "both_sexes");
    }

    #[test]
    fn rows_with_missing_values_are_dropped() {
        let (table, schema) = table(
            &["GeoAreaCode", "TimePeriod", "Value"],
            &[&["4", "2015", ""], &["4", "2016", "1"]],
        );
        let mut diagnostics = Vec::new();
        let datapoints = build_datapoints(&table, &schema, &measure(), &mut diagnostics).unwrap();
        assert_eq!(datapoints.rows.len(), 1);
    }

    #[test]
    fn non_numeric_measures_pass_through_with_a_diagnostic() {
        let (table, schema) = table(
            &["GeoAreaCode", "TimePeriod", "Value"],
            &[&["4", "2015", "substantial"], &["4", "2016", "1"]],
        );
        let mut diagnostics = Vec::new();
        let datapoints = build_datapoints(&table, &schema, &measure(), &mut diagnostics).unwrap();
        assert_eq!(datapoints.rows[0][2], "substantial");
        assert_eq!(datapoints.rows[1][2], "1");
        assert!(
            diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::NonNumericValue)
        );
    }

    #[test]
    fn non_integer_geography_drops_the_row() {
        let (table, schema) = table(
            &["GeoAreaCode", "TimePeriod", "Value"],
            &[&["total", "2015", "1"], &["4", "2015.0", "2"]],
        );
        let mut diagnostics = Vec::new();
        let datapoints = build_datapoints(&table, &schema, &measure(), &mut diagnostics).unwrap();
        assert_eq!(datapoints.rows, vec![vec!["4", "2015", "2"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()]);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::NonIntegerKey && d.count == 1)
        );
    }
}
