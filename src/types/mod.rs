//! Core data types for work tracking.
//!
//! This module defines the data structures used for:
//! - Tasks and their time sessions
//! - Employee profiles and roles
//! - The acting user passed to every mutating operation
//!
//! Rows coming from a store are decoded into these types once, at the
//! repository boundary. Timestamps are milliseconds since the Unix epoch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a task.
pub type TaskId = String;

/// Identifier of a time session.
pub type SessionId = String;

/// Identifier of a user profile.
pub type UserId = String;

/// Default task categories offered when creating a task.
pub const TASK_CATEGORIES: [&str; 8] = [
    "Development",
    "Design",
    "Marketing",
    "Content",
    "SEO",
    "Sales",
    "Meeting",
    "Other",
];

/// Returns the built-in spelling of a category matched case-insensitively,
/// or the trimmed input for a custom one.
pub fn canonical_category(raw: &str) -> String {
    let trimmed = raw.trim();
    TASK_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(trimmed))
        .map_or_else(|| trimmed.to_string(), |c| (*c).to_string())
}

// ============================================================================
// TaskStatus
// ============================================================================

/// Lifecycle status of a task.
///
/// There is no separate paused status: a paused task is `InProgress` with no
/// open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created, no timer ever started
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Timer started at least once
    #[serde(rename = "In Progress")]
    InProgress,
    /// Terminal state
    #[serde(rename = "Finished")]
    Finished,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Finished,
    ];

    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Finished => "Finished",
        }
    }

    /// Returns true if no further timer operations apply.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Finished)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "not started" => Ok(TaskStatus::NotStarted),
            "in progress" => Ok(TaskStatus::InProgress),
            "finished" => Ok(TaskStatus::Finished),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

// ============================================================================
// TimeSession
// ============================================================================

/// One contiguous stretch of work on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSession {
    /// Store-assigned identifier
    pub id: SessionId,
    /// Owning task
    pub task_id: TaskId,
    /// Start instant in epoch milliseconds
    pub start_time: i64,
    /// End instant in epoch milliseconds, `None` while running
    pub end_time: Option<i64>,
}

impl TimeSession {
    /// Returns true if the session has not been closed yet.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

// ============================================================================
// Task
// ============================================================================

/// A unit of work owned by one user, with its time sessions embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    /// Calendar day the task is scheduled for
    pub date: NaiveDate,
    /// Planned duration, drives deadline alerts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_minutes: Option<u32>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Sessions in insertion order
    #[serde(default)]
    pub time_sessions: Vec<TimeSession>,
    /// Creation instant in epoch milliseconds
    pub created_at: i64,
}

impl Task {
    /// Returns the sessions that are still open.
    pub fn open_sessions(&self) -> impl Iterator<Item = &TimeSession> {
        self.time_sessions.iter().filter(|s| s.is_open())
    }

    /// Returns true if the task has a running timer.
    pub fn is_running(&self) -> bool {
        self.time_sessions.iter().any(TimeSession::is_open)
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Owner; admins may assign to another user
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub target_minutes: Option<u32>,
}

/// Partial update of a task's editable fields.
///
/// `target_minutes` is doubly optional: `Some(None)` clears the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_minutes: Option<Option<u32>>,
}

impl TaskUpdate {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.target_minutes.is_none()
    }

    /// Applies the update to a task in place.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(target) = self.target_minutes {
            task.target_minutes = target;
        }
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Returns the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

/// Job family of an employee, used by dashboard filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeType {
    Developer,
    #[serde(rename = "Graphic Designer")]
    GraphicDesigner,
    #[serde(rename = "Digital Marketer")]
    DigitalMarketer,
    #[serde(rename = "Video Editor")]
    VideoEditor,
    #[serde(rename = "Content Writer")]
    ContentWriter,
    #[serde(rename = "SEO Executive")]
    SeoExecutive,
    Sales,
    Other,
}

impl EmployeeType {
    /// All employee types in display order.
    pub const ALL: [EmployeeType; 8] = [
        EmployeeType::Developer,
        EmployeeType::GraphicDesigner,
        EmployeeType::DigitalMarketer,
        EmployeeType::VideoEditor,
        EmployeeType::ContentWriter,
        EmployeeType::SeoExecutive,
        EmployeeType::Sales,
        EmployeeType::Other,
    ];

    /// Returns the display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeType::Developer => "Developer",
            EmployeeType::GraphicDesigner => "Graphic Designer",
            EmployeeType::DigitalMarketer => "Digital Marketer",
            EmployeeType::VideoEditor => "Video Editor",
            EmployeeType::ContentWriter => "Content Writer",
            EmployeeType::SeoExecutive => "SEO Executive",
            EmployeeType::Sales => "Sales",
            EmployeeType::Other => "Other",
        }
    }
}

impl std::fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmployeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['_', '-'], " ");
        EmployeeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown employee type: {s}"))
    }
}

/// A user profile as provided by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub employee_type: EmployeeType,
    pub is_active: bool,
    /// Creation instant in epoch milliseconds
    pub created_at: i64,
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_type: Option<EmployeeType>,
}

// ============================================================================
// Actor
// ============================================================================

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    /// Creates an employee actor.
    pub fn employee(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Employee,
        }
    }

    /// Creates an admin actor.
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    /// Returns true if the actor has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if the actor owns the given task.
    pub fn owns(&self, task: &Task) -> bool {
        self.user_id == task.user_id
    }
}

impl From<&Profile> for Actor {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.id.clone(),
            role: profile.role,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            title: "Build login page".to_string(),
            description: String::new(),
            category: "Development".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            target_minutes: None,
            status: TaskStatus::NotStarted,
            time_sessions: vec![],
            created_at: 0,
        }
    }

    mod task_status_tests {
        use super::*;

        #[test]
        fn test_default_is_not_started() {
            assert_eq!(TaskStatus::default(), TaskStatus::NotStarted);
        }

        #[test]
        fn test_serializes_as_literal_strings() {
            assert_eq!(
                serde_json::to_string(&TaskStatus::NotStarted).unwrap(),
                "\"Not Started\""
            );
            assert_eq!(
                serde_json::to_string(&TaskStatus::InProgress).unwrap(),
                "\"In Progress\""
            );
            let parsed: TaskStatus = serde_json::from_str("\"Finished\"").unwrap();
            assert_eq!(parsed, TaskStatus::Finished);
        }

        #[test]
        fn test_unknown_status_rejected_on_decode() {
            let parsed: Result<TaskStatus, _> = serde_json::from_str("\"Paused\"");
            assert!(parsed.is_err());
        }

        #[test]
        fn test_from_str_is_lenient_about_separators() {
            assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
            assert_eq!("Not Started".parse::<TaskStatus>(), Ok(TaskStatus::NotStarted));
            assert!("done".parse::<TaskStatus>().is_err());
        }

        #[test]
        fn test_only_finished_is_terminal() {
            assert!(!TaskStatus::NotStarted.is_terminal());
            assert!(!TaskStatus::InProgress.is_terminal());
            assert!(TaskStatus::Finished.is_terminal());
        }
    }

    mod task_tests {
        use super::*;

        #[test]
        fn test_is_running_reflects_open_session() {
            let mut task = sample_task();
            assert!(!task.is_running());

            task.time_sessions.push(TimeSession {
                id: "s1".into(),
                task_id: "t1".into(),
                start_time: 1000,
                end_time: Some(2000),
            });
            assert!(!task.is_running());

            task.time_sessions.push(TimeSession {
                id: "s2".into(),
                task_id: "t1".into(),
                start_time: 3000,
                end_time: None,
            });
            assert!(task.is_running());
            assert_eq!(task.open_sessions().count(), 1);
        }

        #[test]
        fn test_task_json_shape() {
            let task = sample_task();
            let json = serde_json::to_value(&task).unwrap();
            assert_eq!(json["date"], "2026-10-19");
            assert_eq!(json["status"], "Not Started");
            assert!(json.get("target_minutes").is_none());
        }

        #[test]
        fn test_update_applies_only_given_fields() {
            let mut task = sample_task();
            task.target_minutes = Some(30);
            let update = TaskUpdate {
                title: Some("Renamed".into()),
                target_minutes: Some(None),
                ..TaskUpdate::default()
            };
            update.apply_to(&mut task);

            assert_eq!(task.title, "Renamed");
            assert_eq!(task.category, "Development");
            assert_eq!(task.target_minutes, None);
            assert!(!update.is_empty());
            assert!(TaskUpdate::default().is_empty());
        }
    }

    mod category_tests {
        use super::*;

        #[test]
        fn test_builtin_category_is_normalized() {
            assert_eq!(canonical_category(" seo "), "SEO");
            assert_eq!(canonical_category("development"), "Development");
        }

        #[test]
        fn test_custom_category_is_kept() {
            assert_eq!(canonical_category("  Research "), "Research");
        }
    }

    mod profile_tests {
        use super::*;

        #[test]
        fn test_employee_type_labels_round_trip() {
            for t in EmployeeType::ALL {
                assert_eq!(t.as_str().parse::<EmployeeType>(), Ok(t));
            }
            assert_eq!(
                "graphic-designer".parse::<EmployeeType>(),
                Ok(EmployeeType::GraphicDesigner)
            );
        }

        #[test]
        fn test_role_serializes_lowercase() {
            assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        }

        #[test]
        fn test_actor_ownership() {
            let task = sample_task();
            assert!(Actor::employee("u1").owns(&task));
            assert!(!Actor::admin("boss").owns(&task));
            assert!(Actor::admin("boss").is_admin());
        }
    }
}
