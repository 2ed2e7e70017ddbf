use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_EXHIBITS_API, DEFAULT_LOG_FILE,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOAST_TTL_SECS, DEFAULT_TOURS_API,
};

/// How local lists are resynchronised after a successful mutation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// GET the whole collection again
    #[default]
    Refetch,
    /// Apply the record returned by the server, refetch only if it is missing
    Merge,
}

/// User configuration, read from ~/.museum/config.yaml
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exhibits_api: String,
    pub tours_api: String,
    pub request_timeout_secs: u64,
    pub refresh_policy: RefreshPolicy,
    pub toast_ttl_secs: u64,
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exhibits_api: DEFAULT_EXHIBITS_API.to_string(),
            tours_api: DEFAULT_TOURS_API.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            refresh_policy: RefreshPolicy::Refetch,
            toast_ttl_secs: DEFAULT_TOAST_TTL_SECS,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl Config {
    /// Default config directory (~/.museum)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    /// Load from the default location and apply environment overrides.
    ///
    /// A broken config file is reported to the caller alongside the defaults,
    /// so startup never fails on it.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        let (mut config, err) = match Self::load_from(&Self::config_dir()) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        (config, err)
    }

    /// Load config.yaml from `dir`, falling back to defaults when it doesn't exist
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Apply MUSEUM_EXHIBITS_API / MUSEUM_TOURS_API from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("MUSEUM_EXHIBITS_API").filter(|v| !v.is_empty()) {
            self.exhibits_api = url;
        }
        if let Some(url) = lookup("MUSEUM_TOURS_API").filter(|v| !v.is_empty()) {
            self.tours_api = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Falls back to the default when the value does not fit a `chrono::Duration`
    pub fn toast_ttl(&self) -> chrono::Duration {
        ttl_from_secs(self.toast_ttl_secs)
            .or_else(|| ttl_from_secs(DEFAULT_TOAST_TTL_SECS))
            .unwrap_or_else(chrono::Duration::zero)
    }
}

pub(crate) fn ttl_from_secs(secs: u64) -> Option<chrono::Duration> {
    i64::try_from(secs).ok().and_then(chrono::Duration::try_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "exhibits_api: http://localhost:9000/exhibits\nrefresh_policy: merge\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.exhibits_api, "http://localhost:9000/exhibits");
        assert_eq!(config.refresh_policy, RefreshPolicy::Merge);
        assert_eq!(config.tours_api, DEFAULT_TOURS_API);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_huge_toast_ttl_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "toast_ttl_secs: 10000000000000000\n").unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.toast_ttl(), chrono::Duration::seconds(DEFAULT_TOAST_TTL_SECS as i64));

        let config = Config { toast_ttl_secs: u64::MAX, ..Config::default() };
        assert_eq!(config.toast_ttl(), chrono::Duration::seconds(DEFAULT_TOAST_TTL_SECS as i64));

        let config = Config { toast_ttl_secs: 10, ..Config::default() };
        assert_eq!(config.toast_ttl(), chrono::Duration::seconds(10));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "refresh_policy: [oops").unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "MUSEUM_TOURS_API" => Some("http://127.0.0.1:1/tours".to_string()),
            "MUSEUM_EXHIBITS_API" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.tours_api, "http://127.0.0.1:1/tours");
        assert_eq!(config.exhibits_api, DEFAULT_EXHIBITS_API);
    }
}
