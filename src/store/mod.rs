//! Task, session and profile persistence.
//!
//! The timer core talks to storage only through [`TaskRepository`] and
//! [`ProfileRepository`]. Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: in-process tables, with failure injection and a call
//!   log for tests
//! - [`JsonFileStore`]: a single JSON document on disk, used by the CLI
//!
//! Both publish to a [`ChangeFeed`] after every successful mutation so that
//! views can invalidate and refetch.

pub mod changes;
pub mod dataset;
pub mod error;
pub mod file;
pub mod memory;
pub mod seed;

use chrono::NaiveDate;

use crate::types::{
    NewTask, Profile, ProfileUpdate, Task, TaskStatus, TaskUpdate, TimeSession,
};

pub use changes::{ChangeFeed, ChangeSubscription, TableChange};
pub use dataset::Dataset;
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::{MemoryStore, StoreOp};
pub use seed::demo_dataset;

/// Row filter applied by the store when listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub user_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskQuery {
    /// Matches every task.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches the tasks of one user.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Returns true if the task passes every set criterion.
    pub fn matches(&self, task: &Task) -> bool {
        self.user_id.as_deref().is_none_or(|u| task.user_id == u)
            && self.date.is_none_or(|d| task.date == d)
            && self.status.is_none_or(|s| task.status == s)
    }
}

/// Storage operations for tasks and their time sessions.
///
/// Every call is a suspension point; a returned error means the write did
/// not happen.
#[allow(async_fn_in_trait)]
pub trait TaskRepository {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError>;
    async fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError>;
    async fn insert_task(&self, task: NewTask, created_at: i64) -> Result<Task, StoreError>;
    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, StoreError>;
    async fn delete_task(&self, id: &str) -> Result<(), StoreError>;
    async fn open_session(&self, task_id: &str, start_time: i64)
        -> Result<TimeSession, StoreError>;
    async fn close_session(&self, session_id: &str, end_time: i64) -> Result<(), StoreError>;
    async fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<(), StoreError>;
    async fn list_open_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TimeSession>, StoreError>;
}

/// Storage operations for user profiles.
#[allow(async_fn_in_trait)]
pub trait ProfileRepository {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError>;
    async fn update_profile(&self, id: &str, update: &ProfileUpdate)
        -> Result<Profile, StoreError>;
    async fn set_active(&self, id: &str, active: bool) -> Result<(), StoreError>;
}

impl<T: TaskRepository + ?Sized> TaskRepository for &T {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        (**self).list_tasks(query).await
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        (**self).get_task(id).await
    }

    async fn insert_task(&self, task: NewTask, created_at: i64) -> Result<Task, StoreError> {
        (**self).insert_task(task, created_at).await
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, StoreError> {
        (**self).update_task(id, update).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete_task(id).await
    }

    async fn open_session(&self, task_id: &str, start_time: i64) -> Result<TimeSession, StoreError> {
        (**self).open_session(task_id, start_time).await
    }

    async fn close_session(&self, session_id: &str, end_time: i64) -> Result<(), StoreError> {
        (**self).close_session(session_id, end_time).await
    }

    async fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<(), StoreError> {
        (**self).set_task_status(task_id, status).await
    }

    async fn list_open_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TimeSession>, StoreError> {
        (**self).list_open_sessions_for_user(user_id).await
    }
}

impl<T: ProfileRepository + ?Sized> ProfileRepository for &T {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        (**self).list_profiles().await
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        (**self).get_profile(id).await
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<Profile, StoreError> {
        (**self).update_profile(id, update).await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<(), StoreError> {
        (**self).set_active(id, active).await
    }
}
