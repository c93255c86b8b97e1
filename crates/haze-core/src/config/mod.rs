//! Configuration management for Haze.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Haze.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Encoding and rendering settings
    pub placeholder: PlaceholderConfig,

    /// Raster source settings
    pub source: SourceConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Hash store settings
    pub store: StoreConfig,

    /// Backfill discovery settings
    pub discovery: DiscoveryConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.haze.haze/config.toml
    /// - Linux: ~/.config/haze/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\haze\config\config.toml
    ///
    /// Falls back to ~/.haze/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "haze", "haze")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".haze").join("config.toml")
            })
    }

    /// Get the resolved hash store path (with ~ expansion).
    pub fn store_path(&self) -> PathBuf {
        let path_str = self.store.path.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.placeholder.components_x, 4);
        assert_eq!(config.placeholder.components_y, 3);
        assert_eq!(config.placeholder.max_sample_width, 200);
        assert_eq!(config.limits.max_file_size_mb, 100);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[placeholder]"));
        assert!(toml.contains("[store]"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("[placeholder]\ncomponents_x = 6\n").unwrap();
        assert_eq!(config.placeholder.components_x, 6);
        assert_eq!(config.placeholder.components_y, 3);
        assert_eq!(config.source.fetch_timeout_ms, 30_000);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::from_toml("[placeholder\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\npath = \"/tmp/h.json\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.store_path(), PathBuf::from("/tmp/h.json"));
    }

    #[test]
    fn test_store_path_keeps_file_name() {
        let config = Config::default();
        let path = config.store_path();
        assert!(path.ends_with(".haze/hashes.json"));
    }
}
