//! Concept catalog construction.
//!
//! Two catalogs describe every column identifier the dataset uses:
//! "continuous" holds the measures with their externally-fetched metadata,
//! "discrete" holds every dimension as an entity domain plus the fixed
//! structural columns. Together they are the referential-integrity
//! contract downstream consumers rely on.

use std::collections::BTreeMap;

use ddf_model::{Concept, ConceptId, ConceptType, ModelError, SeriesMeta};

/// Strip the embedded line breaks the API leaves in free-text fields.
fn clean_text(raw: &str) -> String {
    raw.replace(['\r', '\n'], "")
}

/// Build the continuous catalog: one measure concept per series, sorted by
/// identifier. List-valued associations are flattened into
/// comma-separated strings.
pub fn build_continuous(series: &[SeriesMeta]) -> Result<Vec<Concept>, ModelError> {
    let mut concepts = Vec::with_capacity(series.len());
    for meta in series {
        concepts.push(Concept {
            id: ConceptId::new(meta.code.as_str())?,
            name: meta.code.clone(),
            concept_type: ConceptType::Measure,
            description: Some(clean_text(&meta.description)),
            goal: Some(meta.goal.join(", ")),
            indicator: Some(meta.indicator.join(", ")),
            target: Some(meta.target.join(", ")),
        });
    }
    concepts.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(concepts)
}

/// Build the discrete catalog: every recorded dimension as an entity
/// domain plus the fixed structural concepts, sorted by identifier.
pub fn build_discrete<'a>(
    dimensions: impl IntoIterator<Item = &'a ConceptId>,
) -> Result<Vec<Concept>, ModelError> {
    let mut by_id: BTreeMap<ConceptId, Concept> = BTreeMap::new();
    for id in dimensions {
        by_id.insert(
            id.clone(),
            Concept::discrete(id.clone(), display_name(id), ConceptType::EntityDomain),
        );
    }
    for concept in structural_concepts()? {
        by_id.entry(concept.id.clone()).or_insert(concept);
    }
    Ok(by_id.into_values().collect())
}

/// The structural columns present in every dataset regardless of which
/// dimensions the sources carried.
fn structural_concepts() -> Result<Vec<Concept>, ModelError> {
    let fixed = [
        ("geo_area", "Geo Area", ConceptType::EntityDomain),
        ("year", "Year", ConceptType::Time),
        ("name", "Name", ConceptType::String),
        ("description", "Description", ConceptType::String),
        ("goal", "Goal", ConceptType::String),
        ("indicator", "Indicator", ConceptType::String),
        ("target", "Target", ConceptType::String),
    ];
    fixed
        .into_iter()
        .map(|(id, name, concept_type)| Ok(Concept::discrete(ConceptId::new(id)?, name, concept_type)))
        .collect()
}

/// Title-case a dimension identifier for display: `age_group` -> `Age Group`.
fn display_name(id: &ConceptId) -> String {
    id.as_str()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_continuous, build_discrete, clean_text, display_name};
    use ddf_model::{ConceptId, ConceptType, SeriesMeta};

    #[test]
    fn continuous_catalog_is_sorted_and_flattened() {
        let series = vec![
            SeriesMeta {
                code: "SP_ACS_BSRVH2O".to_string(),
                description: "Water access\r\nsplit over lines".to_string(),
                goal: vec!["6".to_string()],
                target: vec!["6.1".to_string()],
                indicator: vec!["6.1.1".to_string()],
            },
            SeriesMeta {
                code: "AG_LND_FRST".to_string(),
                description: "Forest area".to_string(),
                goal: vec!["15".to_string(), "6".to_string()],
                target: vec!["15.1".to_string()],
                indicator: vec!["15.1.1".to_string()],
            },
        ];
        let concepts = build_continuous(&series).unwrap();
        assert_eq!(concepts[0].id.as_str(), "ag_lnd_frst");
        assert_eq!(concepts[0].name, "AG_LND_FRST");
        assert_eq!(concepts[0].goal.as_deref(), Some("15, 6"));
        assert_eq!(
            concepts[1].description.as_deref(),
            Some("Water accesssplit over lines")
        );
    }

    #[test]
    fn discrete_catalog_is_dimensions_plus_structural_concepts() {
        let sex = ConceptId::new("sex").unwrap();
        let age = ConceptId::new("age_group").unwrap();
        let concepts = build_discrete([&sex, &age]).unwrap();

        let ids: Vec<&str> = concepts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "age_group",
                "description",
                "geo_area",
                "goal",
                "indicator",
                "name",
                "sex",
                "target",
                "year",
            ]
        );

        let age_concept = concepts.iter().find(|c| c.id == age).unwrap();
        assert_eq!(age_concept.name, "Age Group");
        assert_eq!(age_concept.concept_type, ConceptType::EntityDomain);

        let year = concepts.iter().find(|c| c.id.as_str() == "year").unwrap();
        assert_eq!(year.concept_type, ConceptType::Time);
    }

    #[test]
    fn structural_concepts_come_even_with_no_dimensions() {
        let concepts = build_discrete([]).unwrap();
        assert_eq!(concepts.len(), 7);
    }

    #[test]
    fn clean_text_strips_line_breaks() {
        assert_eq!(clean_text("a\r\nb\nc"), "abc");
    }

    #[test]
    fn display_name_title_cases() {
        let id = ConceptId::new("type_of_mobile_technology").unwrap();
        assert_eq!(display_name(&id), "Type Of Mobile Technology");
    }
}
