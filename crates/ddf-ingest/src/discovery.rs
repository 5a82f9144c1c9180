//! Series file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// A discovered source file and the series code taken from its file stem.
#[derive(Debug, Clone)]
pub struct SeriesFile {
    pub path: PathBuf,
    pub code: String,
}

/// List `<SeriesCode>.csv` files in the source directory, sorted by
/// filename for a stable processing order.
pub fn list_series_files(dir: &Path) -> Result<Vec<SeriesFile>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry_result in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry_result.map_err(read_error)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            continue;
        }
        let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        files.push(SeriesFile {
            code: code.to_string(),
            path,
        });
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!(count = files.len(), dir = %dir.display(), "series files discovered");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::list_series_files;
    use crate::error::IngestError;
    use tempfile::TempDir;

    #[test]
    fn lists_csv_files_sorted_with_codes() {
        let dir = TempDir::new().unwrap();
        for name in ["SP_ACS_BSRVH2O.csv", "AG_LND_FRST.csv", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x\n1\n").unwrap();
        }
        let files = list_series_files(dir.path()).unwrap();
        let codes: Vec<&str> = files.iter().map(|file| file.code.as_str()).collect();
        assert_eq!(codes, vec!["AG_LND_FRST", "SP_ACS_BSRVH2O"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");
        let result = list_series_files(&missing);
        assert!(matches!(
            result,
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
