//! Console configuration.
//!
//! Load order:
//! 1. Built-in defaults
//! 2. User override at `~/.ensemble/console.json` (missing keys keep defaults)
//! 3. `ENSEMBLE_CONSOLE_URL` for the registry base URL

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`ConsoleConfig::base_url`].
pub const BASE_URL_ENV: &str = "ENSEMBLE_CONSOLE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid registry URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Registry server root, without a trailing slash.
    pub base_url: String,
    /// Timeout for list, create, delete and describe.
    pub request_timeout_secs: u64,
    /// Timeout for fit and predict, which upload files.
    pub transfer_timeout_secs: u64,
    /// Where prediction and diagnostics files are written.
    pub download_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
            transfer_timeout_secs: 600,
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl ConsoleConfig {
    /// Defaults, then the user override file, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let override_path = Self::override_path();
        let env_url = std::env::var(BASE_URL_ENV).ok();
        Self::resolve(override_path.as_deref(), env_url)
    }

    /// Resolution with explicit inputs. A missing override file is not an error.
    pub fn resolve(override_path: Option<&Path>, env_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match override_path.filter(|p| p.exists()) {
            Some(path) => {
                let config = Self::from_file(path)?;
                log::info!("ConsoleConfig: loaded override from {:?}", path);
                config
            }
            None => Self::default(),
        };

        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            log::info!("ConsoleConfig: registry URL from {}", BASE_URL_ENV);
            config.base_url = url;
        }

        config.normalize()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout_secs)
    }

    /// `~/.ensemble/console.json`
    pub fn override_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".ensemble").join("console.json"))
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&trimmed).map_err(|source| ConfigError::InvalidUrl {
            url: trimmed.clone(),
            source,
        })?;
        self.base_url = trimmed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_override() {
        let config = ConsoleConfig::resolve(None, None).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.transfer_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_partial_override_and_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "http://registry.local:8000/", "request_timeout_secs": 3}}"#).unwrap();

        let config = ConsoleConfig::resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.base_url, "http://registry.local:8000");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.transfer_timeout_secs, 600);

        let config =
            ConsoleConfig::resolve(Some(file.path()), Some("http://other:9000".to_string())).unwrap();
        assert_eq!(config.base_url, "http://other:9000");
    }

    #[test]
    fn test_missing_override_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("console.json");
        assert!(ConsoleConfig::resolve(Some(&missing), None).is_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ConsoleConfig::resolve(Some(file.path()), None),
            Err(ConfigError::Parse { .. })
        ));

        assert!(matches!(
            ConsoleConfig::resolve(None, Some("no scheme here".to_string())),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
