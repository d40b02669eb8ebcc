//! Notification sink error types.

use thiserror::Error;

/// Errors a notification sink may report.
///
/// The deadline notifier logs these and moves on; they never reach the
/// timer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Delivering the notification failed.
    #[error("failed to send notification: {0}")]
    SendFailed(String),
}

impl NotifyError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "Check the notification output, or switch the sink to \"log\" in the config file",
        }
    }
}
