// Application configuration.
// Loads optional user settings from the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::paths;

/// Default song feed endpoint.
pub const DEFAULT_FEED_URL: &str = "https://studio-api.suno.ai/api/feed/v2";

/// Feed endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    /// Page requested from the feed. Only the first page is ever loaded.
    pub page: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            page: 0,
        }
    }
}

/// Local store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Override for the database file location.
    pub path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub store: StoreConfig,
    /// Tracing filter directive used when RUST_LOG is unset, e.g. "songsearch=debug".
    pub log_filter: Option<String>,
}

impl Config {
    /// Load from the default config location, falling back to defaults.
    pub fn load() -> Result<Self> {
        match paths::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Resolved database path: the configured override or the platform default.
    pub fn database_path(&self) -> Result<PathBuf> {
        self.store
            .path
            .clone()
            .or_else(paths::database_path)
            .ok_or_else(|| Error::Other("Could not determine a data directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.page, 0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"store": {"path": "/tmp/songs.json"}, "log_filter": "debug"}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.feed, FeedConfig::default());
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/songs.json")
        );
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ feed: ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Json(_))));
    }
}
