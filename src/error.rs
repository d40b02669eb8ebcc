//! Error types for tracker operations.
//!
//! Validation and authorization failures are detected before any store
//! write. Store failures pass through unchanged so callers can decide
//! whether to retry.

use thiserror::Error;

use crate::store::StoreError;

/// Maximum task title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum task description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Rejected input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("task title must be at most {MAX_TITLE_LEN} characters")]
    TitleTooLong,

    #[error("task description must be at most {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,

    #[error("task category must not be empty")]
    EmptyCategory,

    #[error("target duration must be at least one minute")]
    InvalidTarget,

    #[error("name must not be empty")]
    EmptyName,

    #[error("nothing to update")]
    NothingToUpdate,
}

/// Errors returned by the timer controller and profile manager.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackError {
    /// Input failed validation; nothing was written.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The actor may not perform this action.
    #[error("not allowed to {action}")]
    Forbidden {
        /// What was attempted, e.g. "start the timer of another user's task"
        action: &'static str,
    },

    /// The store call failed; the operation did not happen.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TrackError {
    /// Returns true if re-invoking the same operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_includes_limit() {
        assert!(ValidationError::TitleTooLong.to_string().contains("200"));
        assert!(ValidationError::DescriptionTooLong.to_string().contains("1000"));
    }

    #[test]
    fn test_classification() {
        let forbidden = TrackError::Forbidden { action: "delete this task" };
        assert!(!forbidden.is_retryable());
        assert_eq!(forbidden.to_string(), "not allowed to delete this task");

        let store: TrackError = StoreError::Unavailable("timeout".into()).into();
        assert!(store.is_retryable());
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: TrackError = StoreError::task_not_found("t9").into();
        assert_eq!(err.to_string(), "task 't9' not found");
    }
}
