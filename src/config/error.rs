//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or checking the configuration file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// The file is not valid JSON for [`Config`](super::Config).
    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A setting is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "Check the file permissions, or unset WORKTRACK_CONFIG",
            Self::Parse { .. } => "Fix the JSON syntax, or delete the file to use defaults",
            Self::Invalid(_) => "notify_interval_secs must be between 1 and 3600",
        }
    }
}
