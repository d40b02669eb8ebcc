//! Breakdowns for the dashboard charts.

use serde::Serialize;

use crate::timer::ledger::elapsed_ms;
use crate::types::{Task, TaskStatus};

/// Categories shown in the time-per-category chart.
pub const TOP_TIME_CATEGORIES: usize = 5;

/// Chart series over a task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    /// Task count per category, largest first
    pub by_category: Vec<(String, usize)>,
    /// Task count per status; every status is present, in lifecycle order
    pub by_status: Vec<(TaskStatus, usize)>,
    /// Tracked minutes per category, largest first, at most five entries
    pub minutes_by_category: Vec<(String, u64)>,
}

impl ChartData {
    /// Builds every series. Ties keep the order in which a category first
    /// appears in `tasks`.
    pub fn compute(tasks: &[Task], now: i64) -> Self {
        let mut by_category: Vec<(String, usize)> = Vec::new();
        for task in tasks {
            bump(&mut by_category, &task.category, 1);
        }
        by_category.sort_by(|a, b| b.1.cmp(&a.1));

        let by_status = TaskStatus::ALL
            .iter()
            .map(|s| (*s, tasks.iter().filter(|t| t.status == *s).count()))
            .collect();

        let mut minutes_by_category: Vec<(String, u64)> = Vec::new();
        for task in tasks {
            let ms = elapsed_ms(&task.time_sessions, now);
            if ms > 0 {
                bump(&mut minutes_by_category, &task.category, round_minutes(ms));
            }
        }
        minutes_by_category.sort_by(|a, b| b.1.cmp(&a.1));
        minutes_by_category.truncate(TOP_TIME_CATEGORIES);

        Self {
            by_category,
            by_status,
            minutes_by_category,
        }
    }
}

fn bump<N: std::ops::AddAssign + Copy>(series: &mut Vec<(String, N)>, key: &str, by: N) {
    match series.iter_mut().find(|(k, _)| k == key) {
        Some((_, n)) => *n += by,
        None => series.push((key.to_string(), by)),
    }
}

/// Rounds to the nearest whole minute, halves up.
fn round_minutes(ms: u64) -> u64 {
    (ms + 30_000) / 60_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::*;

    #[test]
    fn test_category_counts_sorted_desc_stable() {
        let tasks = vec![
            task("1", "john", "Design", TaskStatus::NotStarted, day(19), &[]),
            task("2", "john", "Development", TaskStatus::NotStarted, day(19), &[]),
            task("3", "john", "Development", TaskStatus::NotStarted, day(19), &[]),
            task("4", "john", "Meeting", TaskStatus::NotStarted, day(19), &[]),
        ];
        let charts = ChartData::compute(&tasks, 0);
        assert_eq!(
            charts.by_category,
            vec![
                ("Development".to_string(), 2),
                ("Design".to_string(), 1),
                ("Meeting".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_status_series_always_complete() {
        let tasks = vec![task("1", "john", "Design", TaskStatus::Finished, day(19), &[])];
        let charts = ChartData::compute(&tasks, 0);
        assert_eq!(
            charts.by_status,
            vec![
                (TaskStatus::NotStarted, 0),
                (TaskStatus::InProgress, 0),
                (TaskStatus::Finished, 1),
            ]
        );
        assert_eq!(ChartData::compute(&[], 0).by_status.len(), 3);
    }

    #[test]
    fn test_minutes_rounded_per_task_and_zero_skipped() {
        let mut half = task("1", "john", "Design", TaskStatus::Finished, day(19), &[]);
        half.time_sessions = vec![crate::types::TimeSession {
            id: "s".into(),
            task_id: "1".into(),
            start_time: 0,
            end_time: Some(90_000),
        }];
        let tasks = vec![
            half,
            task("2", "john", "Design", TaskStatus::Finished, day(19), &[(0, Some(10))]),
            task("3", "john", "Meeting", TaskStatus::NotStarted, day(19), &[]),
        ];
        let charts = ChartData::compute(&tasks, 0);
        // 1.5 minutes rounds to 2, plus 10
        assert_eq!(charts.minutes_by_category, vec![("Design".to_string(), 12)]);
    }

    #[test]
    fn test_minutes_keep_top_five() {
        let tasks: Vec<_> = (1..=7)
            .map(|i| {
                task(
                    &i.to_string(),
                    "john",
                    &format!("Cat{i}"),
                    TaskStatus::Finished,
                    day(19),
                    &[(0, Some(i))],
                )
            })
            .collect();
        let charts = ChartData::compute(&tasks, 0);
        let names: Vec<_> = charts
            .minutes_by_category
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["Cat7", "Cat6", "Cat5", "Cat4", "Cat3"]);
    }
}
