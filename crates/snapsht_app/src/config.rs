//! Application configuration.
//!
//! Values come from an optional RON file, then the `SNAPSHT_BASE_URL`
//! environment variable, then command-line flags; later sources win.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use snapsht_client::{ClientSettings, PollPolicy, DEFAULT_BASE_URL};
use snapsht_logging::snapsht_info;
use thiserror::Error;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "snapsht.ron";
pub const BASE_URL_ENV: &str = "SNAPSHT_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: Option<u32>,
    pub poll_deadline_secs: Option<u64>,
    pub download_dir: Option<PathBuf>,
    pub max_download_mb: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let poll = PollPolicy::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.map(|timeout| timeout.as_secs()),
            poll_interval_ms: poll.interval.as_millis() as u64,
            poll_max_attempts: poll.max_attempts,
            poll_deadline_secs: poll.deadline.map(|deadline| deadline.as_secs()),
            download_dir: None,
            max_download_mb: client.max_download_bytes / (1024 * 1024),
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given (it must exist), otherwise `snapsht.ron` in
    /// `working_dir` when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = working_dir.join(DEFAULT_CONFIG_FILENAME);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;
        snapsht_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.base_url = base_url;
        }
    }

    pub fn apply_overrides(&mut self, base_url: Option<String>, download_dir: Option<PathBuf>) {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if download_dir.is_some() {
            self.download_dir = download_dir;
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_download_bytes: self.max_download_mb.saturating_mul(1024 * 1024),
        }
    }

    pub fn poll_policy(&self) -> Result<PollPolicy, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
            deadline: self.poll_deadline_secs.map(Duration::from_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_client_and_poller() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(
            config.poll_policy().unwrap().interval,
            Duration::from_millis(2000)
        );
        assert_eq!(config.client_settings().connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(None, temp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&temp.path().join("nope.ron")), temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILENAME),
            "(base_url: \"http://capture.internal:9000\", poll_max_attempts: Some(10))",
        )
        .unwrap();

        let config = AppConfig::load(None, temp.path()).unwrap();
        assert_eq!(config.base_url, "http://capture.internal:9000");
        assert_eq!(config.poll_policy().unwrap().max_attempts, Some(10));
        assert_eq!(config.poll_interval_ms, 2000);
    }

    #[test]
    fn garbage_file_reports_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ron");
        fs::write(&path, "base_url = 3").unwrap();

        let err = AppConfig::load(Some(&path), temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn later_sources_win() {
        let mut config = AppConfig::default();
        config.apply_env(|key| (key == BASE_URL_ENV).then(|| "http://from-env:1".to_string()));
        assert_eq!(config.base_url, "http://from-env:1");

        config.apply_overrides(Some("http://from-flag:2".to_string()), None);
        assert_eq!(config.base_url, "http://from-flag:2");
        assert_eq!(config.download_dir, None);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = AppConfig {
            poll_interval_ms: 0,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.poll_policy(),
            Err(ConfigError::ZeroInterval)
        ));
    }
}
