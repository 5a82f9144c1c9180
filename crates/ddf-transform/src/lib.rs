//! Core normalization pipeline: sanitation, entity accumulation, datapoint
//! reshaping, concept catalogs, and output writing.

pub mod concepts;
pub mod datapoints;
pub mod entities;
pub mod numeric;
pub mod output;
pub mod sanitize;

pub use concepts::{build_continuous, build_discrete};
pub use datapoints::{DatapointTable, build_datapoints};
pub use entities::EntityAccumulator;
pub use numeric::{VALUE_SIGNIFICANT_DIGITS, format_significant, parse_integer, parse_value};
pub use output::{
    CONTINUOUS_CONCEPTS_FILE, DISCRETE_CONCEPTS_FILE, write_continuous_concepts, write_datapoints,
    write_discrete_concepts, write_entities, write_geo_entities,
};
pub use sanitize::{SanitizedTable, sanitize};
