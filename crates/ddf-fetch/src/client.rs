//! SDG indicator API client.
//!
//! Thin request/response plumbing around the three endpoints the pipeline
//! needs: the series list, the geography list, and the per-series bulk CSV
//! download. Retry policy lives in [`crate::retry`]; every call here goes
//! through it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use ddf_model::{GeoArea, SeriesMeta};

use crate::error::{FetchError, Result};
use crate::retry::RetryPolicy;

/// Default UN Stats host; override with `--base-url` or `SDG_API_BASE`.
pub const DEFAULT_API_BASE: &str = "https://unstats.un.org";
/// Environment variable overriding the API host.
pub const API_BASE_ENV_VAR: &str = "SDG_API_BASE";

const API_ROOT: &str = "SDGAPI/v1/sdg";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SdgClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl SdgClient {
    pub fn new(base_url: impl Into<String>, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Network)?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    /// Resolve the base URL from the environment, falling back to the
    /// UN Stats default.
    pub fn base_url_from_env() -> String {
        std::env::var(API_BASE_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_ROOT, path)
    }

    /// List all measures with their descriptive metadata.
    pub fn list_series(&self) -> Result<Vec<SeriesMeta>> {
        let url = self.endpoint("Series/List");
        self.policy.run("series list", || {
            let response = self
                .client
                .get(&url)
                .query(&[("allreleases", "false")])
                .header(USER_AGENT, user_agent())
                .header(ACCEPT, "application/json")
                .send()
                .map_err(FetchError::Network)?;
            let response = check_status(response, &url)?;
            let body = response.text().map_err(FetchError::Network)?;
            serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                url: url.clone(),
                source,
            })
        })
    }

    /// List geography entities as (code, name) pairs. The API serializes
    /// codes as numbers or strings depending on the release, so both are
    /// accepted.
    pub fn list_geo_areas(&self) -> Result<Vec<GeoArea>> {
        let url = self.endpoint("GeoArea/List");
        self.policy.run("geo area list", || {
            let response = self
                .client
                .get(&url)
                .header(USER_AGENT, user_agent())
                .header(ACCEPT, "application/json")
                .send()
                .map_err(FetchError::Network)?;
            let response = check_status(response, &url)?;
            let body = response.text().map_err(FetchError::Network)?;
            let values: Vec<Value> =
                serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                    url: url.clone(),
                    source,
                })?;
            Ok(values.iter().map(geo_from_value).collect())
        })
    }

    /// Download one series' bulk CSV into `<dest_dir>/<code>.csv`.
    pub fn download_series_csv(&self, code: &str, dest_dir: &Path) -> Result<PathBuf> {
        let url = self.endpoint("Series/DataCSV");
        let path = dest_dir.join(format!("{code}.csv"));
        self.policy.run(code, || {
            let response = self
                .client
                .post(&url)
                .form(&[("seriesCodes", code)])
                .header(USER_AGENT, user_agent())
                .send()
                .map_err(FetchError::Network)?;
            let response = check_status(response, &url)?;
            let body = response.bytes().map_err(FetchError::Network)?;
            fs::write(&path, &body).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })
        })?;
        debug!(code, path = %path.display(), "series csv downloaded");
        Ok(path)
    }
}

fn check_status(
    response: reqwest::blocking::Response,
    url: &str,
) -> Result<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Api {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

fn user_agent() -> String {
    format!("ddf-etl/{}", env!("CARGO_PKG_VERSION"))
}

fn geo_from_value(value: &Value) -> GeoArea {
    GeoArea {
        code: field_string(value, "geoAreaCode"),
        name: field_string(value, "geoAreaName"),
    }
}

/// Read a field as text whether the API serialized it as a string or a
/// number.
fn field_string(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{SdgClient, geo_from_value};
    use crate::retry::RetryPolicy;

    #[test]
    fn endpoint_joins_base_and_path() {
        let client = SdgClient::new("https://example.org/", RetryPolicy::default()).unwrap();
        assert_eq!(
            client.endpoint("Series/List"),
            "https://example.org/SDGAPI/v1/sdg/Series/List"
        );
    }

    #[test]
    fn geo_codes_accept_numbers_and_strings() {
        let numeric: serde_json::Value =
            serde_json::from_str(r#"{"geoAreaCode": 4, "geoAreaName": "Afghanistan"}"#).unwrap();
        let textual: serde_json::Value =
            serde_json::from_str(r#"{"geoAreaCode": "8", "geoAreaName": "Albania"}"#).unwrap();
        assert_eq!(geo_from_value(&numeric).code, "4");
        assert_eq!(geo_from_value(&textual).name, "Albania");
    }
}
