use std::path::PathBuf;

use ddf_model::{ConceptId, Diagnostic};

/// Outcome of a full build run.
#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    pub measures: Vec<MeasureSummary>,
    /// Series skipped because their source file carried no data.
    pub skipped: Vec<String>,
    /// Per-file and metadata errors; any entry makes the run exit nonzero.
    pub errors: Vec<String>,
    pub entity_files: Vec<PathBuf>,
    /// False when series metadata was unavailable and the continuous
    /// catalog was skipped.
    pub wrote_continuous: bool,
}

impl BuildResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Per-measure processing summary.
#[derive(Debug)]
pub struct MeasureSummary {
    pub series: String,
    pub concept: ConceptId,
    pub records: usize,
    pub key_columns: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub output: PathBuf,
}
