//! Elapsed-time computation over a task's time sessions.
//!
//! Everything here is pure: callers pass the current instant explicitly so
//! the same functions serve live displays, reports and tests.

use crate::types::{Task, TaskStatus, TimeSession};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;
const MINUTES_PER_DAY: u64 = 1_440;

/// Sums the duration of every session, counting open sessions up to `now`.
///
/// A session whose end lies before its start contributes nothing.
pub fn elapsed_ms(sessions: &[TimeSession], now: i64) -> u64 {
    sessions
        .iter()
        .map(|s| {
            let end = s.end_time.unwrap_or(now);
            u64::try_from(end.saturating_sub(s.start_time)).unwrap_or(0)
        })
        .sum()
}

/// Returns true if any session is still open.
pub fn is_running(sessions: &[TimeSession]) -> bool {
    sessions.iter().any(TimeSession::is_open)
}

/// Formats a duration as `HH:MM:SS`, flooring to whole seconds.
///
/// Hours are not capped: 123 hours renders as `123:00:00`.
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / MS_PER_SECOND;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Formats a duration in words, flooring to whole minutes.
///
/// Zero components are omitted; under a minute renders as
/// `Less than a minute`.
pub fn format_human(ms: u64) -> String {
    let total_min = ms / MS_PER_MINUTE;
    if total_min == 0 {
        return "Less than a minute".to_string();
    }

    let days = total_min / MINUTES_PER_DAY;
    let hours = (total_min % MINUTES_PER_DAY) / 60;
    let minutes = total_min % 60;

    [(days, "day"), (hours, "hour"), (minutes, "minute")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| plural(value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a task's elapsed time the way a task card shows it.
///
/// Running tasks show a live clock, finished tasks the worded total, and a
/// task with nothing logged shows a zero clock.
pub fn format_elapsed(task: &Task, now: i64) -> String {
    let elapsed = elapsed_ms(&task.time_sessions, now);
    if is_running(&task.time_sessions) {
        format_clock(elapsed)
    } else if elapsed == 0 {
        format_clock(0)
    } else if task.status == TaskStatus::Finished {
        format_human(elapsed)
    } else {
        format_clock(elapsed)
    }
}

fn plural(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}
