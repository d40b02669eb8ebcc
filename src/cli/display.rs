//! Display utilities for the worktrack CLI.
//!
//! This module provides formatted output for:
//! - Task lists and timer results
//! - Dashboard summaries and team status
//! - Error messages

use crate::error::TrackError;
use crate::report::{AdminSummary, ChartData, EmployeeSummary, TeamActivity};
use crate::timer::{format_elapsed, format_human, TimerOutcome};
use crate::types::{Profile, Task};

/// Characters of a task id shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Returns the leading part of an id used in listings.
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn owner_name<'a>(task: &'a Task, profiles: &'a [Profile]) -> &'a str {
    profiles
        .iter()
        .find(|p| p.id == task.user_id)
        .map_or(task.user_id.as_str(), |p| p.name.as_str())
}

/// One listing line for a task.
pub fn task_line(task: &Task, owner: Option<&str>, now: i64) -> String {
    let marker = if task.is_running() { "▶" } else { " " };
    let target = task
        .target_minutes
        .map(|m| format!(" / {m} min"))
        .unwrap_or_default();
    let owner = owner.map(|o| format!("  @{o}")).unwrap_or_default();
    format!(
        "{marker} {}  {:<11}  {}  {} [{}]  {}{target}{owner}",
        short_id(&task.id),
        task.status.as_str(),
        task.date,
        task.title,
        task.category,
        format_elapsed(task, now),
    )
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a created task.
    pub fn show_task_created(task: &Task) {
        println!("+ Created task {}", short_id(&task.id));
        println!("  {} [{}] on {}", task.title, task.category, task.date);
        if let Some(target) = task.target_minutes {
            println!("  Target: {target} min");
        }
    }

    /// Shows an edited task.
    pub fn show_task_updated(task: &Task, now: i64) {
        println!("* Updated task");
        println!("{}", task_line(task, None, now));
    }

    /// Shows the result of a delete.
    pub fn show_task_deleted(id: &str, deleted: bool) {
        if deleted {
            println!("- Deleted task {}", short_id(id));
        } else {
            println!("Task {} was already gone", short_id(id));
        }
    }

    /// Shows a task list, with owners when `profiles` is given.
    pub fn show_task_list(tasks: &[Task], profiles: Option<&[Profile]>, now: i64) {
        if tasks.is_empty() {
            println!("No tasks match the current filters.");
            return;
        }
        println!("Tasks ({})", tasks.len());
        for task in tasks {
            let owner = profiles.map(|p| owner_name(task, p));
            println!("{}", task_line(task, owner, now));
        }
    }

    /// Shows what a timer operation did.
    pub fn show_timer_outcome(task: &Task, outcome: &TimerOutcome) {
        match outcome {
            TimerOutcome::Started { paused_tasks, .. } => {
                println!("▶ Timer started: {}", task.title);
                for id in paused_tasks {
                    println!("  paused {}", short_id(id));
                }
            }
            TimerOutcome::KeptRunning { paused_tasks } => {
                println!("▶ Timer already running: {}", task.title);
                for id in paused_tasks {
                    println!("  paused {}", short_id(id));
                }
            }
            TimerOutcome::Paused { .. } => println!("|| Timer paused: {}", task.title),
            TimerOutcome::Finished { .. } => println!("✓ Finished: {}", task.title),
            TimerOutcome::Unchanged(reason) => {
                println!("Nothing to do: {} ({})", reason.as_str(), task.title)
            }
        }
    }

    /// Shows an employee's own day.
    pub fn show_status(
        name: &str,
        greeting: &str,
        summary: &EmployeeSummary,
        today: &[Task],
        now: i64,
    ) {
        let first_name = name.split_whitespace().next().unwrap_or(name);
        println!("Good {greeting}, {first_name}");
        println!("─────────────────────────────");

        match today.iter().find(|t| t.is_running()) {
            Some(task) => println!("Running: {} ({})", task.title, format_elapsed(task, now)),
            None => println!("No timer running"),
        }
        println!("Tasks today:  {}", summary.tasks_today);
        println!("Completed:    {}", summary.completed_today);
        println!("Ongoing:      {}", summary.ongoing);
        println!("Time today:   {}", format_human(summary.time_today_ms));
        println!("This week:    {}", format_human(summary.week_time_ms));

        if !today.is_empty() {
            println!();
            for task in today {
                println!("{}", task_line(task, None, now));
            }
        }
    }

    /// Shows the admin dashboard for a day.
    pub fn show_summary(day: chrono::NaiveDate, summary: &AdminSummary, charts: &ChartData) {
        println!("Team summary for {day}");
        println!("─────────────────────────────");
        println!("Active employees: {}", summary.active_employees);
        println!("Tasks:            {}", summary.tasks_today);
        println!("Completed:        {}", summary.completed_today);
        println!("Time tracked:     {}", format_human(summary.time_today_ms));

        if !charts.by_category.is_empty() {
            println!();
            println!("By category");
            for (category, count) in &charts.by_category {
                println!("  {category:<14} {count}");
            }
        }

        println!();
        println!("By status");
        for (status, count) in &charts.by_status {
            println!("  {:<14} {count}", status.as_str());
        }

        if !charts.minutes_by_category.is_empty() {
            println!();
            println!("Time by category");
            for (category, minutes) in &charts.minutes_by_category {
                println!("  {category:<14} {}", format_human(minutes * 60_000));
            }
        }
    }

    /// Shows who is working on what.
    pub fn show_team(team: &TeamActivity) {
        println!("Working now");
        let mut any = false;
        for member in team.working() {
            any = true;
            if let Some(task) = &member.current {
                println!("  ● {}: {}", member.name, task.title);
            }
        }
        if !any {
            println!("  nobody");
        }

        println!();
        println!("Idle");
        for member in team.idle() {
            let mut notes = Vec::new();
            if !member.in_progress.is_empty() {
                notes.push(format!("{} paused", member.in_progress.len()));
            }
            if !member.todo.is_empty() {
                notes.push(format!("{} to do", member.todo.len()));
            }
            if notes.is_empty() {
                println!("  ○ {}", member.name);
            } else {
                println!("  ○ {} ({})", member.name, notes.join(", "));
            }
        }

        let completed = team.completed();
        if !completed.is_empty() {
            println!();
            println!("Completed today");
            for (name, task) in completed {
                println!("  ✓ {} - {name}", task.title);
            }
        }
    }

    /// Shows the employee list.
    pub fn show_employees(profiles: &[Profile]) {
        if profiles.is_empty() {
            println!("No employees yet.");
            return;
        }
        for p in profiles {
            let state = if p.is_active { "active" } else { "inactive" };
            println!(
                "{:<10} {:<20} {:<18} {:<24} {state}",
                p.id,
                p.name,
                p.employee_type.as_str(),
                p.email
            );
        }
    }

    /// Shows a profile edit.
    pub fn show_employee_updated(profile: &Profile) {
        println!(
            "* Updated {}: {} ({})",
            profile.id,
            profile.name,
            profile.employee_type.as_str()
        );
    }

    /// Shows an activation change.
    pub fn show_employee_toggled(id: &str, active: bool) {
        let state = if active { "activated" } else { "deactivated" };
        println!("* {id} {state}");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows an error with a hint when the library knows one.
    pub fn show_track_error(error: &TrackError) {
        Self::show_error(&error.to_string());
        if let TrackError::Store(e) = error {
            eprintln!("  hint: {}", e.suggestion());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
