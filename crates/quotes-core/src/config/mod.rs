//! Sync configuration shared by every client.
//!
//! `SyncConfig` names the remote feed and the cadence of the sync loop. It is
//! plain serde data so clients can keep it in a JSON file and override fields
//! from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::{FetchResult, HttpRemoteSource};
use crate::util::{is_web_endpoint, non_blank};

pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts?_limit=10";
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(String),
    #[error("Config field '{field}' {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Feed endpoint returning a JSON array of posts
    pub remote_url: String,
    /// Seconds between scheduled sync cycles
    pub sync_interval_secs: u64,
    /// Upper bound for one fetch, in seconds
    pub fetch_timeout_secs: u64,
    /// Seed the default quotes into an empty collection
    pub seed_defaults: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            seed_defaults: true,
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub fn with_remote_url(mut self, remote_url: impl Into<String>) -> Self {
        self.remote_url = remote_url.into();
        self
    }

    #[must_use]
    pub const fn with_sync_interval_secs(mut self, secs: u64) -> Self {
        self.sync_interval_secs = secs;
        self
    }

    #[must_use]
    pub const fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub const fn with_seed_defaults(mut self, seed_defaults: bool) -> Self {
        self.seed_defaults = seed_defaults;
        self
    }

    pub const fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Check field values and normalize the remote URL in place.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let remote_url = non_blank(Some(self.remote_url.clone()))
            .ok_or_else(|| ConfigError::invalid("remote_url", "is required"))?;
        if !is_web_endpoint(&remote_url) {
            return Err(ConfigError::invalid(
                "remote_url",
                "must include http:// or https://",
            ));
        }
        if self.sync_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "sync_interval_secs",
                "must be greater than zero",
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "fetch_timeout_secs",
                "must be greater than zero",
            ));
        }

        self.remote_url = remote_url;
        Ok(())
    }

    /// HTTP adapter for the configured feed.
    pub fn http_remote(&self) -> FetchResult<HttpRemoteSource> {
        HttpRemoteSource::new(self.remote_url.clone(), self.fetch_timeout())
    }
}

/// Parse and validate a config document.
pub fn parse_config(payload: &str) -> Result<SyncConfig, ConfigError> {
    let mut config: SyncConfig =
        serde_json::from_str(payload).map_err(|error| ConfigError::Parse(error.to_string()))?;
    config.validate()?;
    Ok(config)
}
