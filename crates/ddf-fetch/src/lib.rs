//! SDG API collaborator: metadata retrieval and bulk source download with
//! retry, backoff, and a bounded worker pool.

pub mod client;
pub mod download;
pub mod error;
pub mod retry;

pub use client::{API_BASE_ENV_VAR, DEFAULT_API_BASE, SdgClient};
pub use download::{DEFAULT_WORKERS, DownloadReport, MAX_WORKERS, cleanup_source, download_all};
pub use error::{FetchError, Result};
pub use retry::RetryPolicy;
