//! Build pipeline with explicit stages.
//!
//! 1. **Discover**: list `<SeriesCode>.csv` files under the source directory
//! 2. **Transform**: per file, read, detect the key-column set, sanitize,
//!    emit the datapoints table, record entity contributions
//! 3. **Finalize**: flush entities, write entity tables and the geo-area
//!    table, build and write both concept catalogs
//!
//! Per-file failures are recorded and never stop the remaining files; one
//! bad source table must not prevent other measures from being processed
//! or the catalogs from being written.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use ddf_ingest::{SeriesFile, list_series_files, read_csv_table};
use ddf_model::{ConceptId, GeoArea, SeriesMeta, SourceSchema};
use ddf_transform::{
    EntityAccumulator, build_continuous, build_datapoints, build_discrete, sanitize,
    write_continuous_concepts, write_datapoints, write_discrete_concepts, write_entities,
    write_geo_entities,
};

use crate::types::{BuildResult, MeasureSummary};

/// External metadata the build consumes. Fetched by the command layer so
/// the pipeline itself never touches the network.
#[derive(Debug, Default)]
pub struct ExternalMetadata {
    /// `None` when series metadata could not be fetched; the continuous
    /// catalog is skipped and the failure reported by the caller.
    pub series: Option<Vec<SeriesMeta>>,
    pub geo_areas: Vec<GeoArea>,
}

/// Run the normalization pipeline over every source table.
pub fn build_dataset(
    source_dir: &Path,
    output_dir: &Path,
    metadata: &ExternalMetadata,
) -> Result<BuildResult> {
    let files = list_series_files(source_dir).context("list source tables")?;
    info!(
        count = files.len(),
        source = %source_dir.display(),
        "processing source tables"
    );

    let mut result = BuildResult {
        output_dir: output_dir.to_path_buf(),
        measures: Vec::new(),
        skipped: Vec::new(),
        errors: Vec::new(),
        entity_files: Vec::new(),
        wrote_continuous: false,
    };
    let mut accumulator = EntityAccumulator::new();

    for file in &files {
        let span = info_span!("series", code = %file.code);
        let _guard = span.enter();
        match process_series(file, output_dir, &mut accumulator) {
            Ok(Some(summary)) => result.measures.push(summary),
            Ok(None) => {
                info!("source table is empty, skipping");
                result.skipped.push(file.code.clone());
            }
            Err(error) => {
                warn!(error = %format!("{error:#}"), "source table failed");
                result.errors.push(format!("{}: {error:#}", file.code));
            }
        }
    }

    // Entity tables close only after every contributing table has been
    // seen; the accumulator is consumed here.
    let entities = accumulator.flush();
    let dimension_ids: Vec<ConceptId> = entities.keys().cloned().collect();
    result.entity_files = write_entities(output_dir, &entities).context("write entity tables")?;
    result.entity_files.push(
        write_geo_entities(output_dir, &metadata.geo_areas).context("write geo_area entities")?,
    );

    let discrete = build_discrete(dimension_ids.iter()).context("build discrete catalog")?;
    write_discrete_concepts(output_dir, &discrete).context("write discrete catalog")?;

    if let Some(series) = &metadata.series {
        let continuous = build_continuous(series).context("build continuous catalog")?;
        write_continuous_concepts(output_dir, &continuous).context("write continuous catalog")?;
        result.wrote_continuous = true;
    }

    info!(
        measures = result.measures.len(),
        skipped = result.skipped.len(),
        errors = result.errors.len(),
        "build finished"
    );
    Ok(result)
}

/// Process one source table: read, detect, sanitize, reshape, write.
/// Returns `None` for the recoverable empty-source condition.
fn process_series(
    file: &SeriesFile,
    output_dir: &Path,
    accumulator: &mut EntityAccumulator,
) -> Result<Option<MeasureSummary>> {
    let table = read_csv_table(&file.path)?;
    if table.is_empty() {
        return Ok(None);
    }

    let schema = SourceSchema::detect(&table.headers)?;
    let measure = ConceptId::new(file.code.as_str())?;

    let sanitized = sanitize(table, &schema);
    let mut diagnostics = sanitized.diagnostics;

    let datapoints = build_datapoints(&sanitized.table, &schema, &measure, &mut diagnostics)?;

    // Entity contributions use the same sanitized cells the emitter slugs,
    // which keeps datapoint cells and entity identifiers consistent.
    for dimension in &schema.dimensions {
        let values: Vec<&str> = sanitized
            .table
            .rows
            .iter()
            .filter_map(|row| row.get(dimension.index))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect();
        accumulator.record(&dimension.id, values)?;
    }

    let output = write_datapoints(output_dir, &datapoints)?;
    info!(
        measure = %measure,
        records = datapoints.rows.len(),
        output = %output.display(),
        "datapoints written"
    );

    Ok(Some(MeasureSummary {
        series: file.code.clone(),
        concept: measure,
        records: datapoints.rows.len(),
        key_columns: datapoints
            .key_columns
            .iter()
            .map(|id| id.as_str().to_string())
            .collect(),
        diagnostics,
        output,
    }))
}
