use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("api returned status {status} for {url}")]
    Api { status: u16, url: String },
    #[error("decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
    #[error("write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// HTTP statuses worth retrying: timeouts, rate limiting, upstream hiccups.
const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

impl FetchError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Api { status, .. } => RETRYABLE_STATUSES.contains(status),
            FetchError::Decode { .. } | FetchError::Io { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::FetchError;

    #[test]
    fn retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            let error = FetchError::Api {
                status,
                url: "http://example".to_string(),
            };
            assert!(error.is_retryable(), "status {status} should retry");
        }
        let forbidden = FetchError::Api {
            status: 403,
            url: "http://example".to_string(),
        };
        assert!(!forbidden.is_retryable());
        let not_found = FetchError::Api {
            status: 404,
            url: "http://example".to_string(),
        };
        assert!(!not_found.is_retryable());
    }
}
