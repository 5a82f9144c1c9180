use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
    #[error("read source directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("read csv {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

pub type Result<T> = std::result::Result<T, IngestError>;
