//! Output-file writing.
//!
//! Every file is independent and overwritten wholesale on each run; the
//! pipeline is idempotent by re-run, not by patch.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use ddf_model::{Concept, ConceptId, Entity, GEO_AREA_CONCEPT, GeoArea};
use tracing::debug;

use crate::datapoints::DatapointTable;

/// Continuous concept catalog filename.
pub const CONTINUOUS_CONCEPTS_FILE: &str = "concepts--continuous.csv";
/// Discrete concept catalog filename.
pub const DISCRETE_CONCEPTS_FILE: &str = "concepts--discrete.csv";

fn entity_file_name(dimension: &ConceptId) -> String {
    format!("entities--{dimension}.csv")
}

fn open_writer(dir: &Path, file_name: &str) -> Result<(Writer<fs::File>, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create output dir {}", dir.display()))?;
    let path = dir.join(file_name);
    let writer =
        Writer::from_path(&path).with_context(|| format!("open {}", path.display()))?;
    Ok((writer, path))
}

/// Write one measure's datapoint table.
pub fn write_datapoints(dir: &Path, table: &DatapointTable) -> Result<PathBuf> {
    let (mut writer, path) = open_writer(dir, &table.file_name())?;
    let mut header: Vec<&str> = table.key_columns.iter().map(ConceptId::as_str).collect();
    header.push(table.measure.as_str());
    writer
        .write_record(&header)
        .with_context(|| format!("write {}", path.display()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    debug!(path = %path.display(), rows = table.rows.len(), "datapoints written");
    Ok(path)
}

/// Write one entity table per dimension, columns `[<dimension>, name]`.
pub fn write_entities(
    dir: &Path,
    entities: &BTreeMap<ConceptId, Vec<Entity>>,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(entities.len());
    for (dimension, rows) in entities {
        let (mut writer, path) = open_writer(dir, &entity_file_name(dimension))?;
        writer
            .write_record([dimension.as_str(), "name"])
            .with_context(|| format!("write {}", path.display()))?;
        for entity in rows {
            writer
                .write_record([entity.id.as_str(), entity.name.as_str()])
                .with_context(|| format!("write {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flush {}", path.display()))?;
        debug!(path = %path.display(), rows = rows.len(), "entity table written");
        paths.push(path);
    }
    Ok(paths)
}

/// Write the geography entity table from the metadata API, sorted by code
/// for reproducible output.
pub fn write_geo_entities(dir: &Path, geo_areas: &[GeoArea]) -> Result<PathBuf> {
    let mut sorted: Vec<&GeoArea> = geo_areas.iter().collect();
    sorted.sort_by(|a, b| match (a.code.parse::<i64>(), b.code.parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => a.code.cmp(&b.code),
    });

    let (mut writer, path) = open_writer(dir, &format!("entities--{GEO_AREA_CONCEPT}.csv"))?;
    writer
        .write_record([GEO_AREA_CONCEPT, "name"])
        .with_context(|| format!("write {}", path.display()))?;
    for geo in sorted {
        writer
            .write_record([geo.code.as_str(), geo.name.as_str()])
            .with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(path)
}

/// Write the continuous catalog with the full measure-metadata columns.
pub fn write_continuous_concepts(dir: &Path, concepts: &[Concept]) -> Result<PathBuf> {
    let (mut writer, path) = open_writer(dir, CONTINUOUS_CONCEPTS_FILE)?;
    writer
        .write_record([
            "concept",
            "name",
            "concept_type",
            "description",
            "target",
            "goal",
            "indicator",
        ])
        .with_context(|| format!("write {}", path.display()))?;
    for concept in concepts {
        writer
            .write_record([
                concept.id.as_str(),
                concept.name.as_str(),
                concept.concept_type.as_str(),
                concept.description.as_deref().unwrap_or(""),
                concept.target.as_deref().unwrap_or(""),
                concept.goal.as_deref().unwrap_or(""),
                concept.indicator.as_deref().unwrap_or(""),
            ])
            .with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(path)
}

/// Write the discrete catalog, columns `[concept, concept_type, name]`.
pub fn write_discrete_concepts(dir: &Path, concepts: &[Concept]) -> Result<PathBuf> {
    let (mut writer, path) = open_writer(dir, DISCRETE_CONCEPTS_FILE)?;
    writer
        .write_record(["concept", "concept_type", "name"])
        .with_context(|| format!("write {}", path.display()))?;
    for concept in concepts {
        writer
            .write_record([
                concept.id.as_str(),
                concept.concept_type.as_str(),
                concept.name.as_str(),
            ])
            .with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(path)
}
