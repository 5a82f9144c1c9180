//! Source-table schema detection.
//!
//! Source tables are header-driven: geography and time are fixed key
//! columns recognized by name, and every bracket-quoted header is a
//! dimension, except the reporting-type marker which describes data
//! quality rather than a categorical axis.

use crate::concept::ConceptId;
use crate::error::{ModelError, Result};

/// Fixed geography key header.
pub const GEO_AREA_COLUMN: &str = "GeoAreaCode";
/// Fixed time key header.
pub const TIME_PERIOD_COLUMN: &str = "TimePeriod";
/// Indicator-label column, used only for collision filtering.
pub const INDICATOR_COLUMN: &str = "Indicator";
/// Measure value column.
pub const VALUE_COLUMN: &str = "Value";
/// Bracket-marked column that is metadata, not a dimension.
pub const REPORTING_TYPE_COLUMN: &str = "[Reporting Type]";

/// Output identifier for the geography key column.
pub const GEO_AREA_CONCEPT: &str = "geo_area";
/// Output identifier for the time key column.
pub const YEAR_CONCEPT: &str = "year";

/// Display value substituted for missing dimension cells.
pub const NOT_SPECIFIED: &str = "not specified";

/// A bracket-quoted dimension column.
#[derive(Debug, Clone)]
pub struct DimensionColumn {
    pub header: String,
    pub index: usize,
    pub id: ConceptId,
}

/// The validated key-column layout of one source table.
///
/// Geography and time are always the first two key columns regardless of
/// their position in the header row; dimensions follow in header order.
#[derive(Debug, Clone)]
pub struct SourceSchema {
    pub geo_index: usize,
    pub time_index: usize,
    pub value_index: usize,
    /// Absent when the table carries no indicator-label column; collision
    /// filtering is skipped in that case.
    pub indicator_index: Option<usize>,
    pub dimensions: Vec<DimensionColumn>,
}

impl SourceSchema {
    /// Detect the key-column set from a header row.
    ///
    /// Missing geography, time, or value headers make the table
    /// unprocessable: without them a datapoint row has no identity.
    pub fn detect(headers: &[String]) -> Result<Self> {
        let position =
            |name: &str| headers.iter().position(|header| header == name);
        let geo_index =
            position(GEO_AREA_COLUMN).ok_or(ModelError::MissingColumn(GEO_AREA_COLUMN))?;
        let time_index =
            position(TIME_PERIOD_COLUMN).ok_or(ModelError::MissingColumn(TIME_PERIOD_COLUMN))?;
        let value_index =
            position(VALUE_COLUMN).ok_or(ModelError::MissingColumn(VALUE_COLUMN))?;
        let indicator_index = position(INDICATOR_COLUMN);

        let mut dimensions = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            if header == REPORTING_TYPE_COLUMN || !header.starts_with('[') {
                continue;
            }
            dimensions.push(DimensionColumn {
                header: header.clone(),
                index,
                id: ConceptId::new(header.as_str())?,
            });
        }

        Ok(Self {
            geo_index,
            time_index,
            value_index,
            indicator_index,
            dimensions,
        })
    }

    /// Key column indexes in key order: geography, time, dimensions.
    pub fn key_indexes(&self) -> Vec<usize> {
        let mut indexes = vec![self.geo_index, self.time_index];
        indexes.extend(self.dimensions.iter().map(|dimension| dimension.index));
        indexes
    }
}

#[cfg(test)]
mod tests {
    use super::{REPORTING_TYPE_COLUMN, SourceSchema};
    use crate::error::ModelError;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn geography_and_time_lead_the_key_columns() {
        let schema = SourceSchema::detect(&headers(&[
            "Indicator",
            "[Sex]",
            "GeoAreaCode",
            "TimePeriod",
            "Value",
        ]))
        .unwrap();
        assert_eq!(schema.key_indexes(), vec![2, 3, 1]);
        assert_eq!(schema.dimensions[0].id.as_str(), "sex");
    }

    #[test]
    fn dimensions_keep_header_order() {
        let schema = SourceSchema::detect(&headers(&[
            "GeoAreaCode",
            "TimePeriod",
            "[Age]",
            "[Sex]",
            "Value",
        ]))
        .unwrap();
        let ids: Vec<&str> = schema
            .dimensions
            .iter()
            .map(|dimension| dimension.id.as_str())
            .collect();
        assert_eq!(ids, vec!["age", "sex"]);
    }

    #[test]
    fn reporting_type_is_not_a_dimension() {
        let schema = SourceSchema::detect(&headers(&[
            "GeoAreaCode",
            "TimePeriod",
            REPORTING_TYPE_COLUMN,
            "[Sex]",
            "Value",
        ]))
        .unwrap();
        assert_eq!(schema.dimensions.len(), 1);
        assert_eq!(schema.dimensions[0].id.as_str(), "sex");
    }

    #[test]
    fn missing_fixed_columns_are_fatal() {
        let missing_geo = SourceSchema::detect(&headers(&["TimePeriod", "Value"]));
        assert!(matches!(
            missing_geo,
            Err(ModelError::MissingColumn("GeoAreaCode"))
        ));
        let missing_time = SourceSchema::detect(&headers(&["GeoAreaCode", "Value"]));
        assert!(matches!(
            missing_time,
            Err(ModelError::MissingColumn("TimePeriod"))
        ));
        let missing_value = SourceSchema::detect(&headers(&["GeoAreaCode", "TimePeriod"]));
        assert!(matches!(
            missing_value,
            Err(ModelError::MissingColumn("Value"))
        ));
    }

    #[test]
    fn indicator_column_is_optional() {
        let schema =
            SourceSchema::detect(&headers(&["GeoAreaCode", "TimePeriod", "Value"])).unwrap();
        assert!(schema.indicator_index.is_none());
    }
}
