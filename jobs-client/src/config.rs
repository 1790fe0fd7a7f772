use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use jobs_core::DEFAULT_PAGE_SIZE;

use crate::cache::CacheConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the jobs-api server, e.g. "http://localhost:8080"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("jobs-client")
            .join("config.toml"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
api_url = "https://jobs.example.com"

[cache]
stale_after = 30
"#,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://jobs.example.com");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.cache.stale_after, Duration::from_secs(30));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 50\nrequest_timeout_secs = 3\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.api_url, "http://localhost:8080");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = \"many\"").unwrap();

        assert!(ClientConfig::load_from(&path).is_err());
    }
}
