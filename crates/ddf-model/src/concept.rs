use std::fmt;

use crate::error::ModelError;
use crate::slug::to_concept_id;

/// A normalized, stable identifier derived from a display label.
///
/// Construction always normalizes, so a `ConceptId` built from a raw label
/// and one built from an already-normalized identifier compare equal.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ConceptId(String);

impl ConceptId {
    pub fn new(label: impl Into<String>) -> Result<Self, ModelError> {
        let label = label.into();
        let normalized = to_concept_id(&label);
        if normalized.is_empty() {
            return Err(ModelError::EmptyConceptId(label));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ConceptId> for String {
    fn from(id: ConceptId) -> Self {
        id.0
    }
}

/// Catalog classification of a concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptType {
    Measure,
    EntityDomain,
    Time,
    String,
}

impl ConceptType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConceptType::Measure => "measure",
            ConceptType::EntityDomain => "entity_domain",
            ConceptType::Time => "time",
            ConceptType::String => "string",
        }
    }
}

/// One row of a concept catalog.
///
/// Measures carry the descriptive fields fetched from the metadata API;
/// discrete concepts (entity domains, structural columns) leave them unset.
#[derive(Debug, Clone)]
pub struct Concept {
    pub id: ConceptId,
    pub name: String,
    pub concept_type: ConceptType,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub indicator: Option<String>,
    pub target: Option<String>,
}

impl Concept {
    /// A concept without descriptive metadata.
    pub fn discrete(id: ConceptId, name: impl Into<String>, concept_type: ConceptType) -> Self {
        Self {
            id,
            name: name.into(),
            concept_type,
            description: None,
            goal: None,
            indicator: None,
            target: None,
        }
    }
}
