//! User configuration, stored as TOML under the platform config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_DIR: &str = "livescroll-news";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Country whose headlines load at start-up.
    #[serde(default = "default_country")]
    pub country: String,

    /// Articles per page, also the scroll trigger's minimum list length.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_log_path")]
    pub log_path: String,
}

fn default_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("livescroll-news.log")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            country: default_country(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
            log_path: default_log_path(),
        }
    }
}

impl Config {
    /// Parse config from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize config to a TOML string
    pub fn to_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from [`Config::config_path`], writing the defaults first when the
    /// file does not exist.  `NEWS_API_KEY` overrides the stored key.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;

        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            config.api_key = Some(key);
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_str(&content)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string()?)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==================== Default values ====================

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, "https://newsapi.org/v2");
        assert_eq!(config.country, "us");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.log_path.ends_with("livescroll-news.log"));
    }

    // ==================== TOML parsing ====================

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
api_key = "abc123"
base_url = "http://localhost:8080/v2"
country = "gb"
page_size = 50
request_timeout_secs = 5
log_path = "/tmp/news.log"
"#;

        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.country, "gb");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_path, "/tmp/news.log");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = Config::from_str("page_size = \"twenty\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    // ==================== Files ====================

    #[test]
    fn test_load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let original = Config {
            api_key: Some("k".into()),
            country: "de".into(),
            page_size: 10,
            ..Config::default()
        };

        original.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        let path = Config::config_path();
        assert!(path.to_string_lossy().contains(APP_DIR));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
