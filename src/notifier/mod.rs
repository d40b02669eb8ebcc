//! Deadline notifications.
//!
//! The [`DeadlineNotifier`] watches running tasks against their target
//! duration and hands one-shot [`Notification`]s to a [`NotificationSink`].
//! Sinks shipped here:
//!
//! - [`LogSink`]: emits through `tracing`
//! - [`ConsoleSink`]: prints one line per notification to stderr
//! - [`MockNotificationSink`]: records notifications, with failure injection

pub mod deadline;
pub mod error;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::types::TaskId;

pub use self::deadline::{DeadlineNotifier, Threshold};
pub use self::error::NotifyError;

/// How urgent a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Critical => "critical",
        }
    }
}

/// A user-facing message about one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub task_id: TaskId,
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

/// Destination for notifications.
#[allow(async_fn_in_trait)]
pub trait NotificationSink {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).notify(notification).await
    }
}

// ============================================================================
// LogSink
// ============================================================================

/// Sink that writes notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    async fn notify(&self, n: &Notification) -> Result<(), NotifyError> {
        match n.severity {
            Severity::Info => {
                tracing::info!(task_id = %n.task_id, "{}: {}", n.title, n.message)
            }
            Severity::Critical => {
                tracing::warn!(task_id = %n.task_id, "{}: {}", n.title, n.message)
            }
        }
        Ok(())
    }
}

// ============================================================================
// ConsoleSink
// ============================================================================

/// Sink that prints to stderr, for the `watch` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    async fn notify(&self, n: &Notification) -> Result<(), NotifyError> {
        let icon = match n.severity {
            Severity::Info => "⏳",
            Severity::Critical => "⏰",
        };
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{icon} {} - {}", n.title, n.message)
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }
}

// ============================================================================
// MockNotificationSink
// ============================================================================

/// Sink that records every notification it accepts.
#[derive(Debug, Default)]
pub struct MockNotificationSink {
    notifications: Mutex<Vec<Notification>>,
    should_fail: AtomicBool,
}

impl MockNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `notify` call fail until reset.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Returns the titles of the recorded notifications, in order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn clear_recorded(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

impl NotificationSink for MockNotificationSink {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotifyError::SendFailed("Mock failure".to_string()));
        }
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            task_id: "t1".into(),
            title: "Time's up".into(),
            message: "\"Report\" reached its 30-minute target".into(),
            severity: Severity::Critical,
        }
    }

    mod mock_sink_tests {
        use super::*;

        #[tokio::test]
        async fn test_records_notifications() {
            let sink = MockNotificationSink::new();
            sink.notify(&sample()).await.unwrap();
            assert_eq!(sink.notification_count(), 1);
            assert_eq!(sink.titles(), vec!["Time's up".to_string()]);

            sink.clear_recorded();
            assert_eq!(sink.notification_count(), 0);
        }

        #[tokio::test]
        async fn test_failure_injection() {
            let sink = MockNotificationSink::new();
            sink.set_should_fail(true);
            assert!(matches!(
                sink.notify(&sample()).await,
                Err(NotifyError::SendFailed(_))
            ));
            assert_eq!(sink.notification_count(), 0);

            sink.set_should_fail(false);
            assert!(sink.notify(&sample()).await.is_ok());
        }

        #[tokio::test]
        async fn test_reference_is_a_sink() {
            let sink = MockNotificationSink::new();
            let by_ref = &sink;
            by_ref.notify(&sample()).await.unwrap();
            assert_eq!(sink.notification_count(), 1);
        }
    }

    mod builtin_sink_tests {
        use super::*;

        #[tokio::test]
        async fn test_log_and_console_sinks_accept() {
            assert!(LogSink.notify(&sample()).await.is_ok());
            assert!(ConsoleSink.notify(&sample()).await.is_ok());
        }

        #[test]
        fn test_severity_serializes_lowercase() {
            assert_eq!(serde_json::to_string(&Severity::Info).unwrap(), "\"info\"");
            assert_eq!(Severity::Critical.as_str(), "critical");
        }
    }
}
