//! In-memory store with failure injection.

use std::sync::Mutex as StdMutex;

use tokio::sync::Mutex;

use crate::types::{
    NewTask, Profile, ProfileUpdate, Task, TaskStatus, TaskUpdate, TimeSession,
};

use super::{
    ChangeFeed, Dataset, ProfileRepository, StoreError, TableChange, TaskQuery, TaskRepository,
};

/// Repository operations, used to inject failures and inspect call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListTasks,
    GetTask,
    InsertTask,
    UpdateTask,
    DeleteTask,
    OpenSession,
    CloseSession,
    SetTaskStatus,
    ListOpenSessions,
    ListProfiles,
    GetProfile,
    UpdateProfile,
    SetActive,
}

/// Store keeping all tables in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Dataset>,
    changes: ChangeFeed,
    calls: StdMutex<Vec<StoreOp>>,
    fail_once: StdMutex<Vec<StoreOp>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with the given tables.
    #[must_use]
    pub fn with_dataset(data: Dataset) -> Self {
        Self {
            data: Mutex::new(data),
            ..Self::default()
        }
    }

    /// Returns the feed this store publishes mutations to.
    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Makes the next call of `op` fail with [`StoreError::Unavailable`].
    pub fn fail_next(&self, op: StoreOp) {
        self.fail_once.lock().unwrap().push(op);
    }

    /// Returns every operation invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Returns a copy of the current tables.
    pub async fn snapshot(&self) -> Dataset {
        self.data.lock().await.clone()
    }

    /// Adds a profile directly, bypassing the repository traits.
    pub async fn insert_profile(&self, profile: Profile) {
        self.data.lock().await.insert_profile(profile);
        self.changes.publish(TableChange::Profiles);
    }

    fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        let mut pending = self.fail_once.lock().unwrap();
        if let Some(pos) = pending.iter().position(|p| *p == op) {
            pending.remove(pos);
            return Err(StoreError::Unavailable(format!("injected failure on {op:?}")));
        }
        Ok(())
    }
}

impl TaskRepository for MemoryStore {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        self.enter(StoreOp::ListTasks)?;
        Ok(self.data.lock().await.list_tasks(query))
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        self.enter(StoreOp::GetTask)?;
        Ok(self.data.lock().await.get_task(id))
    }

    async fn insert_task(&self, task: NewTask, created_at: i64) -> Result<Task, StoreError> {
        self.enter(StoreOp::InsertTask)?;
        let task = self.data.lock().await.insert_task(task, created_at);
        self.changes.publish(TableChange::Tasks);
        Ok(task)
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, StoreError> {
        self.enter(StoreOp::UpdateTask)?;
        let task = self.data.lock().await.update_task(id, update)?;
        self.changes.publish(TableChange::Tasks);
        Ok(task)
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        self.enter(StoreOp::DeleteTask)?;
        self.data.lock().await.delete_task(id)?;
        self.changes.publish(TableChange::Tasks);
        Ok(())
    }

    async fn open_session(&self, task_id: &str, start_time: i64) -> Result<TimeSession, StoreError> {
        self.enter(StoreOp::OpenSession)?;
        let session = self.data.lock().await.open_session(task_id, start_time)?;
        self.changes.publish(TableChange::Tasks);
        Ok(session)
    }

    async fn close_session(&self, session_id: &str, end_time: i64) -> Result<(), StoreError> {
        self.enter(StoreOp::CloseSession)?;
        self.data.lock().await.close_session(session_id, end_time)?;
        self.changes.publish(TableChange::Tasks);
        Ok(())
    }

    async fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<(), StoreError> {
        self.enter(StoreOp::SetTaskStatus)?;
        self.data.lock().await.set_task_status(task_id, status)?;
        self.changes.publish(TableChange::Tasks);
        Ok(())
    }

    async fn list_open_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TimeSession>, StoreError> {
        self.enter(StoreOp::ListOpenSessions)?;
        Ok(self.data.lock().await.open_sessions_for_user(user_id))
    }
}

impl ProfileRepository for MemoryStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.enter(StoreOp::ListProfiles)?;
        Ok(self.data.lock().await.list_profiles())
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        self.enter(StoreOp::GetProfile)?;
        Ok(self.data.lock().await.get_profile(id))
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<Profile, StoreError> {
        self.enter(StoreOp::UpdateProfile)?;
        let profile = self.data.lock().await.update_profile(id, update)?;
        self.changes.publish(TableChange::Profiles);
        Ok(profile)
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<(), StoreError> {
        self.enter(StoreOp::SetActive)?;
        self.data.lock().await.set_active(id, active)?;
        self.changes.publish(TableChange::Profiles);
        Ok(())
    }
}
