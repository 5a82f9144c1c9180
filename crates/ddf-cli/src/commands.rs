//! Subcommand implementations.

use anyhow::{Context, Result};
use tracing::{info, warn};

use ddf_fetch::{RetryPolicy, SdgClient, cleanup_source, download_all};

use ddf_cli::pipeline::{ExternalMetadata, build_dataset};
use ddf_cli::types::BuildResult;

use crate::cli::{BuildArgs, FetchArgs};

/// Download all series CSVs. Returns true when any series failed.
pub fn run_fetch(args: &FetchArgs) -> Result<bool> {
    let client = client_from(args.base_url.as_deref())?;
    if !args.keep_existing {
        cleanup_source(&args.source_dir).context("clean source directory")?;
    }
    let series = client.list_series().context("list series")?;
    info!(count = series.len(), "series listed");

    let report =
        download_all(&client, &series, &args.source_dir, args.jobs).context("download series")?;
    for (code, error) in &report.failures {
        eprintln!("failed: {code}: {error}");
    }
    Ok(!report.failures.is_empty())
}

/// Run the full normalization pipeline. Metadata fetch failures degrade
/// the run (recorded as errors) instead of aborting it: the datapoint and
/// entity outputs remain independently producible.
pub fn run_build(args: &BuildArgs) -> Result<BuildResult> {
    let client = client_from(args.base_url.as_deref())?;
    let mut metadata_errors = Vec::new();

    let series = match client.list_series() {
        Ok(series) => Some(series),
        Err(error) => {
            warn!(error = %error, "series metadata fetch failed");
            metadata_errors.push(format!("continuous catalog skipped: {error}"));
            None
        }
    };
    let geo_areas = match client.list_geo_areas() {
        Ok(geo_areas) => geo_areas,
        Err(error) => {
            warn!(error = %error, "geo area fetch failed");
            metadata_errors.push(format!("geo_area entities unavailable: {error}"));
            Vec::new()
        }
    };

    let metadata = ExternalMetadata { series, geo_areas };
    let mut result = build_dataset(&args.source_dir, &args.output_dir, &metadata)?;
    result.errors.extend(metadata_errors);
    Ok(result)
}

fn client_from(base_url: Option<&str>) -> Result<SdgClient> {
    let base_url = base_url
        .map(str::to_string)
        .unwrap_or_else(SdgClient::base_url_from_env);
    SdgClient::new(base_url, RetryPolicy::default()).context("build api client")
}
