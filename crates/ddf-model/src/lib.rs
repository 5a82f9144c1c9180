pub mod concept;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod schema;
pub mod series;
pub mod slug;

pub use concept::{Concept, ConceptId, ConceptType};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use entity::{Entity, GeoArea};
pub use error::{ModelError, Result};
pub use schema::{
    DimensionColumn, GEO_AREA_COLUMN, GEO_AREA_CONCEPT, INDICATOR_COLUMN, NOT_SPECIFIED,
    REPORTING_TYPE_COLUMN, SourceSchema, TIME_PERIOD_COLUMN, VALUE_COLUMN, YEAR_CONCEPT,
};
pub use series::SeriesMeta;
pub use slug::to_concept_id;
