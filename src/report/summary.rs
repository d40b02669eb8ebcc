//! Stat cards for the admin and employee dashboards.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::timer::ledger::elapsed_ms;
use crate::types::{Profile, Role, Task, TaskStatus};

/// Team-wide numbers for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminSummary {
    /// Active profiles with the employee role
    pub active_employees: usize,
    pub tasks_today: usize,
    pub completed_today: usize,
    pub time_today_ms: u64,
}

impl AdminSummary {
    pub fn compute(tasks: &[Task], profiles: &[Profile], today: NaiveDate, now: i64) -> Self {
        let active_employees = profiles
            .iter()
            .filter(|p| p.is_active && p.role == Role::Employee)
            .count();
        let (tasks_today, completed_today, time_today_ms) = day_totals(tasks.iter(), today, now);

        Self {
            active_employees,
            tasks_today,
            completed_today,
            time_today_ms,
        }
    }
}

/// One employee's own numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    pub tasks_today: usize,
    /// `In Progress` tasks of any date
    pub ongoing: usize,
    pub completed_today: usize,
    pub time_today_ms: u64,
    /// Time on tasks dated from the last Sunday through today
    pub week_time_ms: u64,
}

impl EmployeeSummary {
    pub fn compute(tasks: &[Task], user_id: &str, today: NaiveDate, now: i64) -> Self {
        let mine: Vec<&Task> = tasks.iter().filter(|t| t.user_id == user_id).collect();

        let (tasks_today, completed_today, time_today_ms) =
            day_totals(mine.iter().copied(), today, now);
        let ongoing = mine
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .count();

        let from = week_start(today);
        let week_time_ms = mine
            .iter()
            .filter(|t| t.date >= from && t.date <= today)
            .map(|t| elapsed_ms(&t.time_sessions, now))
            .sum();

        Self {
            tasks_today,
            ongoing,
            completed_today,
            time_today_ms,
            week_time_ms,
        }
    }
}

fn day_totals<'a>(
    tasks: impl Iterator<Item = &'a Task>,
    day: NaiveDate,
    now: i64,
) -> (usize, usize, u64) {
    tasks
        .filter(|t| t.date == day)
        .fold((0, 0, 0), |(count, done, ms), t| {
            (
                count + 1,
                done + usize::from(t.status == TaskStatus::Finished),
                ms + elapsed_ms(&t.time_sessions, now),
            )
        })
}

/// The Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    let back = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(back)).unwrap_or(day)
}

/// Part of the day for a greeting line, from a 24-hour clock hour.
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "morning",
        12..=16 => "afternoon",
        _ => "evening",
    }
}
