//! Work Tracking Library
//!
//! This library provides the core functionality for the worktrack CLI.
//! It includes:
//! - Elapsed-time ledger and start/pause/finish timer controller
//! - Deadline notifier for tasks with a target duration
//! - Task and profile repositories (in-memory and JSON file)
//! - Dashboard summaries, team status and CSV export
//! - Configuration loading and CLI command definitions

pub mod cli;
pub mod config;
pub mod error;
pub mod notifier;
pub mod profiles;
pub mod report;
pub mod store;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{TrackError, ValidationError};
pub use types::{
    Actor, EmployeeType, NewTask, Profile, ProfileUpdate, Role, Task, TaskStatus, TaskUpdate,
    TimeSession,
};

pub use config::{Config, ConfigError, SinkKind};
pub use notifier::{
    ConsoleSink, DeadlineNotifier, LogSink, MockNotificationSink, Notification, NotificationSink,
    NotifyError, Severity, Threshold,
};
pub use profiles::ProfileManager;
pub use report::{AdminSummary, ChartData, EmployeeSummary, TaskFilter, TeamActivity};
pub use store::{
    ChangeFeed, JsonFileStore, MemoryStore, ProfileRepository, StoreError, StoreOp, TableChange,
    TaskQuery, TaskRepository,
};
pub use timer::{Clock, ManualClock, NoChange, SystemClock, TimerController, TimerOutcome};
