use crate::concept::ConceptId;
use crate::error::ModelError;

/// One value of a dimension: a stable identifier plus the display name it
/// was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: ConceptId,
    pub name: String,
}

impl Entity {
    pub fn from_name(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        let id = ConceptId::new(name.as_str())?;
        Ok(Self { id, name })
    }
}

/// A geography entity from the metadata API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoArea {
    pub code: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::Entity;

    #[test]
    fn entity_id_is_slug_of_name() {
        let entity = Entity::from_name("15 to 24 years old").unwrap();
        assert_eq!(entity.id.as_str(), "15_to_24_years_old");
        assert_eq!(entity.name, "15 to 24 years old");
    }
}
