//! Cross-table entity accumulation.

use std::collections::{BTreeMap, BTreeSet};

use ddf_model::{ConceptId, Entity, ModelError};

/// Accumulates (identifier, display name) pairs per dimension across every
/// source table that uses the dimension.
///
/// The accumulator is an explicit value threaded through the per-file
/// processing loop. Deduplication against prior tables happens only in
/// [`EntityAccumulator::flush`], which takes the accumulator by value: a
/// dimension's entity set is not closed until every contributing table has
/// been seen, so flushing is a one-shot, end-of-run operation the type
/// system will not let you repeat.
#[derive(Debug, Default)]
pub struct EntityAccumulator {
    dimensions: BTreeMap<ConceptId, Vec<Entity>>,
}

impl EntityAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the values one source table contributed to a dimension.
    ///
    /// Values are deduplicated within the call (first occurrence wins) but
    /// deliberately not against prior tables.
    pub fn record<'a>(
        &mut self,
        dimension: &ConceptId,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ModelError> {
        let entry = self.dimensions.entry(dimension.clone()).or_default();
        let mut seen = BTreeSet::new();
        for value in values {
            if !seen.insert(value) {
                continue;
            }
            entry.push(Entity::from_name(value)?);
        }
        Ok(())
    }

    /// Deduplicate by identifier (first-seen display name wins) and sort by
    /// identifier, yielding one reproducible table per dimension.
    pub fn flush(self) -> BTreeMap<ConceptId, Vec<Entity>> {
        let mut flushed = BTreeMap::new();
        for (dimension, entities) in self.dimensions {
            let mut seen = BTreeSet::new();
            let mut deduped: Vec<Entity> = Vec::with_capacity(entities.len());
            for entity in entities {
                if seen.insert(entity.id.clone()) {
                    deduped.push(entity);
                }
            }
            deduped.sort_by(|a, b| a.id.cmp(&b.id));
            flushed.insert(dimension, deduped);
        }
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::EntityAccumulator;
    use ddf_model::ConceptId;

    fn sex() -> ConceptId {
        ConceptId::new("sex").unwrap()
    }

    #[test]
    fn merges_overlapping_tables_into_one_deduplicated_set() {
        let mut accumulator = EntityAccumulator::new();
        accumulator.record(&sex(), ["Male", "Female"]).unwrap();
        accumulator.record(&sex(), ["Female", "Total"]).unwrap();

        let flushed = accumulator.flush();
        assert_eq!(flushed.len(), 1);
        let entities = &flushed[&sex()];
        let ids: Vec<&str> = entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["female", "male", "total"]);
    }

    #[test]
    fn first_seen_display_name_wins() {
        let mut accumulator = EntityAccumulator::new();
        accumulator.record(&sex(), ["MALE"]).unwrap();
        accumulator.record(&sex(), ["Male"]).unwrap();

        let flushed = accumulator.flush();
        assert_eq!(flushed[&sex()].len(), 1);
        assert_eq!(flushed[&sex()][0].name, "MALE");
    }

    #[test]
    fn dimensions_stay_separate() {
        let mut accumulator = EntityAccumulator::new();
        let age = ConceptId::new("age").unwrap();
        accumulator.record(&sex(), ["Male"]).unwrap();
        accumulator.record(&age, ["15 to 24"]).unwrap();

        let flushed = accumulator.flush();
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[&age][0].id.as_str(), "15_to_24");
    }

    #[test]
    fn unslugifiable_value_is_an_error() {
        let mut accumulator = EntityAccumulator::new();
        assert!(accumulator.record(&sex(), ["--"]).is_err());
    }
}
