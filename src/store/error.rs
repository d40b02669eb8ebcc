//! Store error types.
//!
//! A failed store call means the mutation did not happen. Callers retry by
//! re-invoking the high-level operation, never by replaying a single step.

use thiserror::Error;

/// Errors returned by task and profile repositories.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Record kind ("task", "session", "profile")
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(String),

    /// Stored data could not be decoded into typed records.
    #[error("failed to decode stored data: {0}")]
    Decode(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The write would break a record invariant.
    #[error("conflicting write: {0}")]
    Conflict(String),
}

impl StoreError {
    /// Shorthand for a missing task.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "task",
            id: id.into(),
        }
    }

    /// Shorthand for a missing session.
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "session",
            id: id.into(),
        }
    }

    /// Shorthand for a missing profile.
    pub fn profile_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "profile",
            id: id.into(),
        }
    }

    /// Returns true if the record was missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if re-invoking the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Refresh the task list; the record may have been deleted",
            Self::Io(_) => "Check that the data file is writable",
            Self::Decode(_) => "The data file is corrupt; restore it from a backup",
            Self::Unavailable(_) => "Retry the operation",
            Self::Conflict(_) => "Refresh the task list and retry",
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
