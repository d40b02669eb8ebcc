//! CSV export of a task list.

use std::borrow::Cow;

use crate::timer::ledger::{elapsed_ms, format_clock};
use crate::types::{Profile, Task};

/// Header row of the export.
pub const CSV_HEADER: &str =
    "Employee,Employee Type,Date,Title,Category,Status,Target Minutes,Elapsed,Elapsed Minutes";

/// Renders `tasks` as CSV, one row per task, in the given order.
///
/// Owners without a profile are written by id with an empty type.
pub fn export_csv(tasks: &[Task], profiles: &[Profile], now: i64) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for task in tasks {
        let owner = profiles.iter().find(|p| p.id == task.user_id);
        let employee = owner.map_or(task.user_id.as_str(), |p| p.name.as_str());
        let employee_type = owner.map_or("", |p| p.employee_type.as_str());
        let target = task
            .target_minutes
            .map(|m| m.to_string())
            .unwrap_or_default();
        let elapsed = elapsed_ms(&task.time_sessions, now);

        let row = [
            field(employee),
            field(employee_type),
            Cow::Owned(task.date.to_string()),
            field(&task.title),
            field(&task.category),
            Cow::Borrowed(task.status.as_str()),
            Cow::Owned(target),
            Cow::Owned(format_clock(elapsed)),
            Cow::Owned((elapsed / 60_000).to_string()),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

/// Quotes a field if it holds a delimiter, quote or line break.
fn field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
