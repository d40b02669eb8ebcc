//! Timer state transitions for tasks.
//!
//! This module owns the per-task state machine:
//! - `Not Started` → `In Progress` on start
//! - `In Progress` stays `In Progress` on pause (only the session closes)
//! - `Not Started` / `In Progress` → `Finished` on finish (terminal)
//!
//! and the cross-task rule that a user has at most one open session. The
//! rule holds by construction: start closes every other open session of the
//! user before opening a new one. Each operation re-reads the open sessions
//! from the store, so a failed call can be retried by invoking it again.
//!
//! Two clients starting timers for the same user at the same moment can
//! still race; nothing here locks across store calls.

use crate::error::TrackError;
use crate::store::{StoreError, TaskRepository};
use crate::types::{Actor, NewTask, Task, TaskId, TaskStatus, TaskUpdate, TimeSession};

use super::clock::Clock;
use super::validate;

// ============================================================================
// TimerOutcome
// ============================================================================

/// Why an operation left everything as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoChange {
    /// The task no longer exists
    NoSuchTask,
    /// The task is finished; timers no longer apply
    AlreadyFinished,
    /// The task already has an open session
    AlreadyRunning,
    /// The task has no open session
    NotRunning,
}

impl NoChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoChange::NoSuchTask => "task not found",
            NoChange::AlreadyFinished => "task is already finished",
            NoChange::AlreadyRunning => "timer is already running",
            NoChange::NotRunning => "timer is not running",
        }
    }
}

/// What a timer operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerOutcome {
    /// A session was opened
    Started {
        /// The new open session
        session: TimeSession,
        /// Other tasks of the same user whose timers were paused first
        paused_tasks: Vec<TaskId>,
    },
    /// Open sessions of the task were closed
    Paused {
        closed: usize,
    },
    /// The task moved to `Finished`
    Finished {
        closed: usize,
    },
    /// The task was already running; open sessions on the user's other
    /// tasks were closed
    KeptRunning {
        paused_tasks: Vec<TaskId>,
    },
    /// Nothing was written
    Unchanged(NoChange),
}

impl TimerOutcome {
    /// Returns true if the store was modified.
    pub fn is_changed(&self) -> bool {
        !matches!(self, TimerOutcome::Unchanged(_))
    }
}

// ============================================================================
// TimerController
// ============================================================================

/// Applies timer actions and task edits against a repository.
#[derive(Debug)]
pub struct TimerController<R, C> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository, C: Clock> TimerController<R, C> {
    /// Creates a controller over the given repository and clock.
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns the controller's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Starts the timer of a task.
    ///
    /// Closes every other open session of the task's owner, then opens a
    /// session on this task and marks it `In Progress`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Forbidden`] if the actor does not own the task,
    /// or the store error of the first failing step.
    pub async fn start(&self, actor: &Actor, task_id: &str) -> Result<TimerOutcome, TrackError> {
        let Some(task) = self.repo.get_task(task_id).await? else {
            return Ok(TimerOutcome::Unchanged(NoChange::NoSuchTask));
        };
        authorize_timer(actor, &task, "start the timer of another user's task")?;
        if task.status.is_terminal() {
            return Ok(TimerOutcome::Unchanged(NoChange::AlreadyFinished));
        }

        let now = self.clock.now_ms();
        let open = self.repo.list_open_sessions_for_user(&task.user_id).await?;

        let mut paused_tasks: Vec<TaskId> = Vec::new();
        for session in open.iter().filter(|s| s.task_id != task.id) {
            self.close(session, now).await?;
            if !paused_tasks.contains(&session.task_id) {
                paused_tasks.push(session.task_id.clone());
            }
        }

        if open.iter().any(|s| s.task_id == task.id) {
            if paused_tasks.is_empty() {
                return Ok(TimerOutcome::Unchanged(NoChange::AlreadyRunning));
            }
            tracing::warn!(
                task_id = %task.id,
                closed_on = ?paused_tasks,
                "closed stray open sessions while timer was already running"
            );
            return Ok(TimerOutcome::KeptRunning { paused_tasks });
        }

        let session = self.repo.open_session(&task.id, now).await?;
        self.repo
            .set_task_status(&task.id, TaskStatus::InProgress)
            .await?;

        tracing::info!(task_id = %task.id, paused = ?paused_tasks, "timer started");
        Ok(TimerOutcome::Started {
            session,
            paused_tasks,
        })
    }

    /// Pauses the timer of a task. The status stays `In Progress`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Forbidden`] if the actor does not own the task,
    /// or the store error of the first failing close.
    pub async fn pause(&self, actor: &Actor, task_id: &str) -> Result<TimerOutcome, TrackError> {
        let Some(task) = self.repo.get_task(task_id).await? else {
            return Ok(TimerOutcome::Unchanged(NoChange::NoSuchTask));
        };
        authorize_timer(actor, &task, "pause the timer of another user's task")?;

        let closed = self.close_all(&task).await?;
        if closed == 0 {
            return Ok(TimerOutcome::Unchanged(NoChange::NotRunning));
        }

        tracing::info!(task_id = %task.id, closed, "timer paused");
        Ok(TimerOutcome::Paused { closed })
    }

    /// Finishes a task: closes its open sessions, then marks it `Finished`.
    ///
    /// Finishing a finished task is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Forbidden`] if the actor does not own the task,
    /// or the store error of the first failing step.
    pub async fn finish(&self, actor: &Actor, task_id: &str) -> Result<TimerOutcome, TrackError> {
        let Some(task) = self.repo.get_task(task_id).await? else {
            return Ok(TimerOutcome::Unchanged(NoChange::NoSuchTask));
        };
        authorize_timer(actor, &task, "finish another user's task")?;

        let closed = self.close_all(&task).await?;
        if task.status.is_terminal() {
            if closed == 0 {
                return Ok(TimerOutcome::Unchanged(NoChange::AlreadyFinished));
            }
            tracing::warn!(task_id = %task.id, closed, "closed sessions left open on a finished task");
            return Ok(TimerOutcome::Finished { closed });
        }

        self.repo
            .set_task_status(&task.id, TaskStatus::Finished)
            .await?;

        tracing::info!(task_id = %task.id, closed, "task finished");
        Ok(TimerOutcome::Finished { closed })
    }

    /// Creates a task in `Not Started` with no sessions.
    ///
    /// Employees may only create tasks for themselves; admins may assign a
    /// task to anyone.
    ///
    /// # Errors
    ///
    /// Validation and authorization errors are returned before any store
    /// call.
    pub async fn create_task(&self, actor: &Actor, task: NewTask) -> Result<Task, TrackError> {
        let task = validate::new_task(task)?;
        if task.user_id != actor.user_id && !actor.is_admin() {
            return Err(TrackError::Forbidden {
                action: "create tasks for another user",
            });
        }

        let created = self.repo.insert_task(task, self.clock.now_ms()).await?;
        tracing::info!(task_id = %created.id, user_id = %created.user_id, "task created");
        Ok(created)
    }

    /// Edits a task's title, description, category, date or target.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, [`TrackError::Forbidden`]
    /// unless the actor owns the task or is an admin, and
    /// [`StoreError::NotFound`] if the task is gone.
    pub async fn update_task(
        &self,
        actor: &Actor,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, TrackError> {
        let update = validate::task_update(update)?;
        let task = self
            .repo
            .get_task(task_id)
            .await?
            .ok_or_else(|| StoreError::task_not_found(task_id))?;
        authorize_edit(actor, &task, "edit another user's task")?;

        let updated = self.repo.update_task(task_id, &update).await?;
        tracing::info!(task_id = %updated.id, "task updated");
        Ok(updated)
    }

    /// Deletes a task and its sessions.
    ///
    /// Returns `false` if the task was already gone.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Forbidden`] unless the actor owns the task or is
    /// an admin.
    pub async fn delete_task(&self, actor: &Actor, task_id: &str) -> Result<bool, TrackError> {
        let Some(task) = self.repo.get_task(task_id).await? else {
            return Ok(false);
        };
        authorize_edit(actor, &task, "delete another user's task")?;

        match self.repo.delete_task(task_id).await {
            Ok(()) => {
                tracing::info!(task_id, "task deleted");
                Ok(true)
            }
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn close_all(&self, task: &Task) -> Result<usize, TrackError> {
        let now = self.clock.now_ms();
        let mut closed = 0;
        for session in task.open_sessions() {
            self.close(session, now).await?;
            closed += 1;
        }
        Ok(closed)
    }

    async fn close(&self, session: &TimeSession, now: i64) -> Result<(), TrackError> {
        // A skewed clock must not produce a negative session.
        let end = now.max(session.start_time);
        self.repo.close_session(&session.id, end).await?;
        Ok(())
    }
}

fn authorize_timer(actor: &Actor, task: &Task, action: &'static str) -> Result<(), TrackError> {
    if actor.owns(task) {
        Ok(())
    } else {
        Err(TrackError::Forbidden { action })
    }
}

fn authorize_edit(actor: &Actor, task: &Task, action: &'static str) -> Result<(), TrackError> {
    if actor.owns(task) || actor.is_admin() {
        Ok(())
    } else {
        Err(TrackError::Forbidden { action })
    }
}

// ============================================================================
// Tests
// ============================================================================
