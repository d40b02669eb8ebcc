//! Dashboard aggregation and export.
//!
//! Everything here is a pure function of a task list, the profile list and
//! the current instant, so the same numbers come out of the CLI, tests and
//! any future front end.
//!
//! - [`TaskFilter`]: the admin dashboard's filter bar
//! - [`summary`]: admin and employee stat cards
//! - [`charts`]: category and status breakdowns
//! - [`team`]: who is working on what right now
//! - [`export`]: CSV rendering of a filtered task list

pub mod charts;
pub mod export;
pub mod summary;
pub mod team;

use chrono::NaiveDate;

use crate::types::{EmployeeType, Profile, Task, TaskStatus, UserId};

pub use charts::ChartData;
pub use export::{export_csv, CSV_HEADER};
pub use summary::{greeting, week_start, AdminSummary, EmployeeSummary};
pub use team::{MemberActivity, TaskBrief, TeamActivity};

/// Task filter; an unset field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub date: Option<NaiveDate>,
    pub user_id: Option<UserId>,
    pub employee_type: Option<EmployeeType>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Returns true if no criterion is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns the matching tasks, in their original order.
    ///
    /// Employee type is looked up through `profiles`; tasks whose owner has
    /// no profile never match a type filter.
    pub fn apply(&self, tasks: &[Task], profiles: &[Profile]) -> Vec<Task> {
        let owners: Option<Vec<&str>> = self.employee_type.map(|ty| {
            profiles
                .iter()
                .filter(|p| p.employee_type == ty)
                .map(|p| p.id.as_str())
                .collect()
        });

        tasks
            .iter()
            .filter(|t| self.date.is_none_or(|d| t.date == d))
            .filter(|t| self.user_id.as_deref().is_none_or(|u| t.user_id == u))
            .filter(|t| {
                owners
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&t.user_id.as_str()))
            })
            .filter(|t| self.status.is_none_or(|s| t.status == s))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::store::seed::profile;
    use crate::types::{EmployeeType, Profile, Role, Task, TaskStatus, TimeSession};

    pub const MIN: i64 = 60_000;

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    pub fn profiles() -> Vec<Profile> {
        let mut retired = profile("old", "Old Timer", Role::Employee, EmployeeType::Sales);
        retired.is_active = false;
        vec![
            profile("admin", "Admin User", Role::Admin, EmployeeType::Other),
            profile("john", "John Developer", Role::Employee, EmployeeType::Developer),
            profile("sarah", "Sarah Designer", Role::Employee, EmployeeType::GraphicDesigner),
            retired,
        ]
    }

    /// A task with one session per `(start, end)` pair, in minutes.
    pub fn task(
        id: &str,
        user: &str,
        category: &str,
        status: TaskStatus,
        date: NaiveDate,
        sessions: &[(i64, Option<i64>)],
    ) -> Task {
        Task {
            id: id.into(),
            user_id: user.into(),
            title: format!("Task {id}"),
            description: String::new(),
            category: category.into(),
            date,
            target_minutes: None,
            status,
            time_sessions: sessions
                .iter()
                .enumerate()
                .map(|(i, (start, end))| TimeSession {
                    id: format!("{id}-s{i}"),
                    task_id: id.into(),
                    start_time: start * MIN,
                    end_time: end.map(|e| e * MIN),
                })
                .collect(),
            created_at: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            task("a", "john", "Development", TaskStatus::InProgress, day(19), &[]),
            task("b", "sarah", "Design", TaskStatus::Finished, day(19), &[]),
            task("c", "john", "Meeting", TaskStatus::NotStarted, day(18), &[]),
            task("d", "ghost", "Other", TaskStatus::NotStarted, day(19), &[]),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything_in_order() {
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&tasks(), &profiles())), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_filter_by_date_and_user() {
        let filter = TaskFilter {
            date: Some(day(19)),
            user_id: Some("john".into()),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter.apply(&tasks(), &profiles())), vec!["a"]);
    }

    #[test]
    fn test_filter_by_employee_type_uses_profiles() {
        let filter = TaskFilter {
            employee_type: Some(EmployeeType::GraphicDesigner),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter.apply(&tasks(), &profiles())), vec!["b"]);

        // "ghost" has no profile, so no type can match it.
        let other = TaskFilter {
            employee_type: Some(EmployeeType::Other),
            ..TaskFilter::default()
        };
        assert!(other.apply(&tasks(), &profiles()).is_empty());
    }

    #[test]
    fn test_filter_by_status() {
        let filter = TaskFilter {
            status: Some(TaskStatus::NotStarted),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter.apply(&tasks(), &profiles())), vec!["c", "d"]);
    }
}
