//! Settings file.
//!
//! The file is JSON and every field is optional:
//!
//! ```json
//! {
//!   "data_file": "~/.worktrack/data.json",
//!   "notify_interval_secs": 10,
//!   "default_category": "Development",
//!   "sink": "console"
//! }
//! ```
//!
//! It is read from `$WORKTRACK_CONFIG` if set, otherwise from
//! `~/.worktrack/config.json`. A missing file means defaults.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use self::error::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "WORKTRACK_CONFIG";

const APP_DIR: &str = ".worktrack";

/// Allowed range for the deadline check interval.
pub const NOTIFY_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 1..=3600;

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

fn default_data_file() -> PathBuf {
    app_dir().join("data.json")
}

fn default_notify_interval_secs() -> u64 {
    10
}

fn default_category() -> String {
    "Development".to_string()
}

/// Where deadline notifications go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Through the tracing subscriber
    #[default]
    Log,
    /// One line per notification on stderr
    Console,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON file holding profiles and tasks.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Seconds between deadline checks in `watch`.
    #[serde(default = "default_notify_interval_secs")]
    pub notify_interval_secs: u64,

    /// Category used by `add` when none is given.
    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default)]
    pub sink: SinkKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            notify_interval_secs: default_notify_interval_secs(),
            default_category: default_category(),
            sink: SinkKind::default(),
        }
    }
}

impl Config {
    /// Path of the config file: `$WORKTRACK_CONFIG` or the default location.
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| app_dir().join("config.json"))
    }

    /// Loads the config from [`Config::path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    /// Loads and validates the config at `path`; a missing file yields
    /// defaults.
    ///
    /// A relative `data_file` is resolved against the config file's
    /// directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let mut config: Config = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if config.data_file.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_file = dir.join(&config.data_file);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !NOTIFY_INTERVAL_RANGE.contains(&self.notify_interval_secs) {
            return Err(ConfigError::Invalid(format!(
                "notify_interval_secs must be between {} and {}, got {}",
                NOTIFY_INTERVAL_RANGE.start(),
                NOTIFY_INTERVAL_RANGE.end(),
                self.notify_interval_secs
            )));
        }
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_category must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn notify_interval(&self) -> Duration {
        Duration::from_secs(self.notify_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = Config::default();
            assert_eq!(config.notify_interval_secs, 10);
            assert_eq!(config.notify_interval(), Duration::from_secs(10));
            assert_eq!(config.default_category, "Development");
            assert_eq!(config.sink, SinkKind::Log);
            assert!(config.data_file.ends_with("data.json"));
        }

        #[test]
        fn test_partial_json_fills_defaults() {
            let config: Config = serde_json::from_str(r#"{"sink":"console"}"#).unwrap();
            assert_eq!(config.sink, SinkKind::Console);
            assert_eq!(config.notify_interval_secs, 10);
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_missing_file_is_default() {
            let dir = TempDir::new().unwrap();
            let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
            assert_eq!(config, Config::default());
        }

        #[test]
        fn test_relative_data_file_resolves_next_to_config() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("config.json");
            std::fs::write(&path, r#"{"data_file":"tasks.json","notify_interval_secs":30}"#)
                .unwrap();

            let config = Config::load_from(&path).unwrap();
            assert_eq!(config.data_file, dir.path().join("tasks.json"));
            assert_eq!(config.notify_interval_secs, 30);
        }

        #[test]
        fn test_parse_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("config.json");
            std::fs::write(&path, "{ not json").unwrap();
            assert!(matches!(
                Config::load_from(&path),
                Err(ConfigError::Parse { .. })
            ));
        }

        #[test]
        fn test_out_of_range_interval_rejected() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("config.json");
            std::fs::write(&path, r#"{"notify_interval_secs":0}"#).unwrap();
            assert!(matches!(
                Config::load_from(&path),
                Err(ConfigError::Invalid(_))
            ));
        }

        #[test]
        fn test_blank_category_rejected() {
            let config = Config {
                default_category: "  ".into(),
                ..Config::default()
            };
            assert!(config.validate().is_err());
        }
    }
}
