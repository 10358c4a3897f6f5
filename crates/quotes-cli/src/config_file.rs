//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use quotes_core::config::SyncConfig;
use quotes_core::util::non_blank;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";

pub const REMOTE_URL_ENV: &str = "QUOTES_REMOTE_URL";
pub const SYNC_INTERVAL_ENV: &str = "QUOTES_SYNC_INTERVAL_SECS";
pub const DB_PATH_ENV: &str = "QUOTES_DB_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            db_path: None,
            sync: SyncConfig::default(),
        }
    }
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotes")
        .join(CONFIG_FILE_NAME)
}

impl CliConfig {
    /// Read the config at `path`; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!(
                "Failed to read config at {}: {error}",
                path.display()
            ))
        })?;
        serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CliError::Config(format!(
                    "Failed to create config directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized).map_err(|error| {
            CliError::Config(format!(
                "Failed to write config at {}: {error}",
                path.display()
            ))
        })
    }

    /// Apply `QUOTES_*` overrides, looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = non_blank(lookup(REMOTE_URL_ENV)) {
            self.sync.remote_url = url;
        }
        if let Some(raw) = non_blank(lookup(SYNC_INTERVAL_ENV)) {
            self.sync.sync_interval_secs = raw.parse().map_err(|_| {
                CliError::Config(format!(
                    "{SYNC_INTERVAL_ENV} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }
        if let Some(path) = non_blank(lookup(DB_PATH_ENV)) {
            self.db_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), CliError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn unique_config_path() -> PathBuf {
        std::env::temp_dir().join(format!(
            "quotes-cli-config-test-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |duration| duration.as_nanos())
        ))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = CliConfig::load_from_path(&unique_config_path()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn config_roundtrip_preserves_sync_settings() {
        let path = unique_config_path();
        let config = CliConfig {
            sync: SyncConfig::default()
                .with_remote_url("https://example.com/posts")
                .with_sync_interval_secs(90),
            ..CliConfig::default()
        };

        config.save_to_path(&path).unwrap();
        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let path = unique_config_path();
        std::fs::write(&path, r#"{ "version": 1, "profiles": {} }"#).unwrap();

        let error = CliConfig::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("unknown field"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn overrides_replace_file_values() {
        let env = HashMap::from([
            (REMOTE_URL_ENV, " https://feed.example.com/posts "),
            (SYNC_INTERVAL_ENV, "5"),
        ]);
        let mut config = CliConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.sync.remote_url, "https://feed.example.com/posts");
        assert_eq!(config.sync.sync_interval_secs, 5);
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn overrides_reject_non_numeric_interval() {
        let mut config = CliConfig::default();
        let error = config
            .apply_overrides(|key| (key == SYNC_INTERVAL_ENV).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(error, CliError::Config(_)));
    }
}
