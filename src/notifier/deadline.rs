//! Target-duration warnings for running tasks.
//!
//! Each evaluation pass looks at `In Progress` tasks that have a target and
//! computes the remaining minutes from their sessions. Three thresholds are
//! checked independently on every pass:
//!
//! | threshold     | fires when           | severity |
//! |---------------|----------------------|----------|
//! | `TenMinutes`  | `5 < remaining ≤ 10` | info     |
//! | `FiveMinutes` | `0 < remaining ≤ 5`  | critical |
//! | `TimesUp`     | `remaining ≤ 0`      | critical |
//!
//! A threshold fires at most once per tracking entry. Entries are keyed by
//! task id and remember the target they were created for: changing the
//! target starts a fresh entry, and entries of tasks that disappear from the
//! evaluated list are dropped.

use std::collections::{HashMap, HashSet};

use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::store::{ChangeSubscription, TableChange, TaskQuery, TaskRepository};
use crate::timer::{ledger, Clock};
use crate::types::{Task, TaskId, TaskStatus};

use super::{Notification, NotificationSink, Severity};

const MS_PER_MINUTE: f64 = 60_000.0;

/// A remaining-time boundary that triggers one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    TenMinutes,
    FiveMinutes,
    TimesUp,
}

impl Threshold {
    /// All thresholds, in the order they are crossed.
    pub const ALL: [Threshold; 3] = [
        Threshold::TenMinutes,
        Threshold::FiveMinutes,
        Threshold::TimesUp,
    ];

    /// Returns true if `remaining` minutes falls in this threshold's band.
    pub fn contains(&self, remaining: f64) -> bool {
        match self {
            Threshold::TenMinutes => remaining > 5.0 && remaining <= 10.0,
            Threshold::FiveMinutes => remaining > 0.0 && remaining <= 5.0,
            Threshold::TimesUp => remaining <= 0.0,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Threshold::TenMinutes => Severity::Info,
            Threshold::FiveMinutes | Threshold::TimesUp => Severity::Critical,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Threshold::TenMinutes => "10 minutes remaining",
            Threshold::FiveMinutes => "5 minutes remaining",
            Threshold::TimesUp => "Time's up",
        }
    }

    fn notification(&self, task: &Task, target_minutes: u32) -> Notification {
        let message = match self {
            Threshold::TenMinutes => format!("\"{}\" has about 10 minutes left", task.title),
            Threshold::FiveMinutes => format!("\"{}\" has about 5 minutes left", task.title),
            Threshold::TimesUp => format!(
                "\"{}\" reached its {target_minutes}-minute target",
                task.title
            ),
        };
        Notification {
            task_id: task.id.clone(),
            title: self.title().to_string(),
            message,
            severity: self.severity(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    target_minutes: u32,
    fired: HashSet<Threshold>,
}

/// Minutes left before the task reaches its target; negative once over.
pub fn remaining_minutes(task: &Task, target_minutes: u32, now: i64) -> f64 {
    f64::from(target_minutes) - ledger::elapsed_ms(&task.time_sessions, now) as f64 / MS_PER_MINUTE
}

// ============================================================================
// DeadlineNotifier
// ============================================================================

/// Fires one-shot threshold notifications for running tasks.
#[derive(Debug)]
pub struct DeadlineNotifier<S> {
    sink: S,
    entries: HashMap<TaskId, Entry>,
}

impl<S: NotificationSink> DeadlineNotifier<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            entries: HashMap::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Number of tasks currently tracked.
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    /// Drops the tracking entry of a task, so its thresholds can fire again.
    pub fn forget(&mut self, task_id: &str) {
        self.entries.remove(task_id);
    }

    /// Marks the thresholds newly crossed by `tasks` at `now` as fired and
    /// returns their notifications. Sends nothing.
    pub fn due(&mut self, tasks: &[Task], now: i64) -> Vec<Notification> {
        self.entries
            .retain(|id, _| tasks.iter().any(|t| &t.id == id));

        let mut due = Vec::new();
        for task in tasks {
            if task.status != TaskStatus::InProgress {
                continue;
            }
            let Some(target) = task.target_minutes else {
                continue;
            };

            let entry = self.entries.entry(task.id.clone()).or_insert_with(|| Entry {
                target_minutes: target,
                fired: HashSet::new(),
            });
            if entry.target_minutes != target {
                tracing::debug!(task_id = %task.id, old = entry.target_minutes, new = target, "target changed, resetting thresholds");
                entry.target_minutes = target;
                entry.fired.clear();
            }

            let remaining = remaining_minutes(task, target, now);
            for threshold in Threshold::ALL {
                if threshold.contains(remaining) && entry.fired.insert(threshold) {
                    due.push(threshold.notification(task, target));
                }
            }
        }
        due
    }

    /// Runs one evaluation pass and delivers what is due.
    ///
    /// Returns how many notifications the sink accepted. Sink failures are
    /// logged; the threshold still counts as fired.
    pub async fn evaluate(&mut self, tasks: &[Task], now: i64) -> usize {
        let due = self.due(tasks, now);
        tracing::debug!(tasks = tasks.len(), due = due.len(), "deadline check");

        let mut delivered = 0;
        for notification in &due {
            match self.sink.notify(notification).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    task_id = %notification.task_id,
                    error = %e,
                    hint = e.suggestion(),
                    "failed to deliver deadline notification"
                ),
            }
        }
        delivered
    }

    /// Re-fetches `query` from the repository every `period` and whenever
    /// `changes` reports the task table changed, and evaluates the result,
    /// until `shutdown` turns true or its sender is dropped.
    ///
    /// A failed fetch is skipped. A closed feed leaves only the ticker.
    pub async fn run<R, C>(
        &mut self,
        repo: &R,
        clock: &C,
        query: &TaskQuery,
        period: Duration,
        mut changes: ChangeSubscription,
        mut shutdown: watch::Receiver<bool>,
    ) where
        R: TaskRepository,
        C: Clock,
    {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut feed_open = true;

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh(repo, clock, query).await;
                }
                change = changes.invalidated(), if feed_open => match change {
                    Some(TableChange::Tasks) => {
                        tracing::debug!("task table changed, re-checking deadlines");
                        self.refresh(repo, clock, query).await;
                    }
                    Some(TableChange::Profiles) => {}
                    None => {
                        tracing::debug!("change feed closed, polling only");
                        feed_open = false;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("deadline notifier stopped");
    }

    async fn refresh<R, C>(&mut self, repo: &R, clock: &C, query: &TaskQuery)
    where
        R: TaskRepository,
        C: Clock,
    {
        match repo.list_tasks(query).await {
            Ok(tasks) => {
                self.evaluate(&tasks, clock.now_ms()).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to refresh tasks for deadline check");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
