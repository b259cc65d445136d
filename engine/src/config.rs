//! Engine configuration.

use crate::snapshot::{FileSnapshotStore, DEFAULT_STORAGE_KEY};
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_STORAGE_DIR: &str = ".tote";
const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for wiring an engine to disk and to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fixed key the snapshot is stored under
    pub storage_key: String,
    /// Directory holding snapshot files
    pub storage_dir: PathBuf,
    /// Base URL of the collection and catalog API
    pub api_base_url: String,
    /// Transport timeout for every HTTP request
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `TOTE_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_key = lookup("TOTE_STORAGE_KEY").unwrap_or(defaults.storage_key);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }

        let storage_dir = lookup("TOTE_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let api_base_url = lookup("TOTE_API_URL").unwrap_or(defaults.api_base_url);

        let request_timeout = match lookup("TOTE_REQUEST_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            None => defaults.request_timeout,
        };

        let config = Self {
            storage_key,
            storage_dir,
            api_base_url,
            request_timeout,
        };
        config.api_url()?;
        Ok(config)
    }

    /// Parsed API base URL.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidApiUrl {
            url: self.api_base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Snapshot store for the configured key and directory.
    pub fn snapshot_store(&self) -> FileSnapshotStore {
        FileSnapshotStore::new(&self.storage_dir, &self.storage_key)
    }

    /// HTTP client with the configured timeout.
    ///
    /// `headers` typically carries the session's bearer token.
    pub fn http_client(&self, headers: HeaderMap) -> Result<Client, ConfigError> {
        Client::builder()
            .timeout(self.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TOTE_STORAGE_KEY must not be empty")]
    EmptyStorageKey,

    #[error("Invalid TOTE_REQUEST_TIMEOUT_MS value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid TOTE_API_URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.storage_key, "tote.wishlist");
    }

    #[test]
    fn reads_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("TOTE_STORAGE_KEY", "tote.cart"),
            ("TOTE_STORAGE_DIR", "/tmp/tote"),
            ("TOTE_API_URL", "https://api.example.com/v2/"),
            ("TOTE_REQUEST_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();

        assert_eq!(config.storage_key, "tote.cart");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/tote"));
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(
            config.snapshot_store().path(),
            PathBuf::from("/tmp/tote/tote.cart.json")
        );
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            EngineConfig::from_lookup(lookup(&[("TOTE_REQUEST_TIMEOUT_MS", "soon")])),
            Err(ConfigError::InvalidTimeout("soon".into()))
        );
        assert_eq!(
            EngineConfig::from_lookup(lookup(&[("TOTE_STORAGE_KEY", "  ")])),
            Err(ConfigError::EmptyStorageKey)
        );
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[("TOTE_API_URL", "not a url")])),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }
}
