//! User settings loaded from `~/.apex/config.yaml`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::codegen::CodeLanguage;
use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_LOG_FILE, DEFAULT_MAX_RETRIES, DEFAULT_POOL_CAPACITY,
    DEFAULT_POOL_IDLE_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_MS, SETTINGS_FILE,
};
use crate::network::RetryPolicy;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub use_retry: bool,
    pub default_language: CodeLanguage,
    pub log_file: PathBuf,
    pub pool_capacity: usize,
    pub pool_idle_secs: u64,
    /// Directory of extra API configurations merged into the registry
    pub extra_config_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            use_retry: true,
            default_language: CodeLanguage::Curl,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            pool_capacity: DEFAULT_POOL_CAPACITY,
            pool_idle_secs: DEFAULT_POOL_IDLE_SECS,
            extra_config_dir: None,
        }
    }
}

impl Settings {
    /// `~/.apex`, or `./.apex` when no home directory is known
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    /// Load from the default location; a missing file means defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_dir().join(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Extra configuration directory, defaulting to `~/.apex/apis`
    pub fn api_config_dir(&self) -> PathBuf {
        self.extra_config_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("apis"))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_retries: 1\ndefault_language: python\nuse_retry: false\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.default_language, CodeLanguage::Python);
        assert!(!settings.use_retry);
        assert_eq!(settings.retry_delay_ms, DEFAULT_RETRY_DELAY_MS);
        assert_eq!(settings.pool_capacity, DEFAULT_POOL_CAPACITY);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_retries: many\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
    }

    #[test]
    fn test_extra_config_dir_override() {
        let settings = Settings {
            extra_config_dir: Some(PathBuf::from("/tmp/apis")),
            ..Settings::default()
        };
        assert_eq!(settings.api_config_dir(), PathBuf::from("/tmp/apis"));
    }
}
