//! Bulk source download with a bounded worker pool.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing::{info, warn};

use ddf_model::SeriesMeta;

use crate::client::SdgClient;
use crate::error::{FetchError, Result};

/// Default number of concurrent download workers. Kept small to stay under
/// the API's rate limits.
pub const DEFAULT_WORKERS: usize = 2;
/// Upper bound on download concurrency.
pub const MAX_WORKERS: usize = 8;

/// Outcome of a bulk download run.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: usize,
    /// Series that exhausted their retries, with the final error.
    pub failures: Vec<(String, String)>,
}

/// Remove stale source CSVs so a fresh fetch starts clean. A missing
/// directory is fine; it will be created by the download.
pub fn cleanup_source(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| FetchError::Io {
            path: path.clone(),
            source,
        }
    };
    let mut removed = 0usize;
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            fs::remove_file(&path).map_err(io_error(&path))?;
            removed += 1;
        }
    }
    if removed > 0 {
        info!(removed, dir = %dir.display(), "stale source files removed");
    }
    Ok(())
}

/// Download every series' CSV with up to `workers` concurrent requests.
///
/// A series that fails after retries is recorded in the report and never
/// aborts its siblings; the remaining measures stay independently
/// processable.
pub fn download_all(
    client: &SdgClient,
    series: &[SeriesMeta],
    dest_dir: &Path,
    workers: usize,
) -> Result<DownloadReport> {
    fs::create_dir_all(dest_dir).map_err(|source| FetchError::Io {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let queue: Mutex<VecDeque<&SeriesMeta>> = Mutex::new(series.iter().collect());
    let report = Mutex::new(DownloadReport::default());
    let workers = workers.clamp(1, MAX_WORKERS);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                loop {
                    let next = {
                        let Ok(mut queue) = queue.lock() else {
                            break;
                        };
                        queue.pop_front()
                    };
                    let Some(meta) = next else {
                        break;
                    };
                    match client.download_series_csv(&meta.code, dest_dir) {
                        Ok(_) => {
                            if let Ok(mut report) = report.lock() {
                                report.downloaded += 1;
                            }
                        }
                        Err(error) => {
                            warn!(code = %meta.code, error = %error, "series download failed");
                            if let Ok(mut report) = report.lock() {
                                report.failures.push((meta.code.clone(), error.to_string()));
                            }
                        }
                    }
                }
            });
        }
    });

    let report = match report.into_inner() {
        Ok(report) => report,
        Err(poisoned) => poisoned.into_inner(),
    };
    info!(
        downloaded = report.downloaded,
        failed = report.failures.len(),
        "bulk download finished"
    );
    Ok(report)
}
