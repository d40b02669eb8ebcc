//! JSON file store.
//!
//! The whole dataset lives in one JSON document. Every operation reloads
//! it, so separate CLI invocations always see each other's writes, and
//! every mutation rewrites it through a temporary file and a rename.
//!
//! Writes by other processes do not go through this instance's change feed.
//! [`JsonFileStore::watch_external`] compares the file's modification time
//! and length against what this instance last read or wrote, and publishes
//! both tables when they differ.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::sync::{watch, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::types::{
    NewTask, Profile, ProfileUpdate, Task, TaskStatus, TaskUpdate, TimeSession,
};

use super::{
    ChangeFeed, Dataset, ProfileRepository, StoreError, TableChange, TaskQuery, TaskRepository,
};

/// Store persisting all tables to a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    changes: ChangeFeed,
    /// File stamp as of the last read or write. `None` until first seen.
    seen: Mutex<Option<FileStamp>>,
}

/// Modification time and length, or `None` for a missing file.
type FileStamp = Option<(SystemTime, u64)>;

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            changes: ChangeFeed::new(),
            seen: Mutex::new(None),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the feed this store publishes mutations to.
    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Reads the whole dataset. A missing file is an empty dataset.
    pub async fn load(&self) -> Result<Dataset, StoreError> {
        self.remember_stamp().await?;
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Dataset::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Dataset::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the whole dataset.
    pub async fn replace(&self, data: &Dataset) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.save(data).await?;
        self.changes.publish(TableChange::Tasks);
        self.changes.publish(TableChange::Profiles);
        Ok(())
    }

    async fn save(&self, data: &Dataset) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| StoreError::Io(format!("failed to encode dataset: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        self.remember_stamp().await?;
        Ok(())
    }

    async fn stamp(&self) -> Result<FileStamp, StoreError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(Some((meta.modified()?, meta.len()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remember_stamp(&self) -> Result<(), StoreError> {
        let stamp = self.stamp().await?;
        *self.seen.lock().await = Some(stamp);
        Ok(())
    }

    /// Checks whether the file changed since this instance last read or
    /// wrote it, and publishes both tables if so.
    ///
    /// The first call only records a baseline.
    pub async fn check_external_change(&self) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let current = self.stamp().await?;
        let previous = self.seen.lock().await.replace(current);
        let changed = matches!(previous, Some(p) if p != current);
        if changed {
            tracing::debug!(path = %self.path.display(), "data file changed on disk");
            self.changes.publish(TableChange::Tasks);
            self.changes.publish(TableChange::Profiles);
        }
        Ok(changed)
    }

    /// Calls [`Self::check_external_change`] every `period` until
    /// `shutdown` turns true or its sender is dropped.
    pub async fn watch_external(&self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.check_external_change().await {
                        tracing::warn!(error = %e, "failed to check data file for changes");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }

    async fn read<T>(&self, f: impl FnOnce(&Dataset) -> T) -> Result<T, StoreError> {
        let data = self.load().await?;
        Ok(f(&data))
    }

    async fn mutate<T>(
        &self,
        change: TableChange,
        f: impl FnOnce(&mut Dataset) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;
        let out = f(&mut data)?;
        self.save(&data).await?;
        self.changes.publish(change);
        Ok(out)
    }
}

impl TaskRepository for JsonFileStore {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        self.read(|d| d.list_tasks(query)).await
    }

    async fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        self.read(|d| d.get_task(id)).await
    }

    async fn insert_task(&self, task: NewTask, created_at: i64) -> Result<Task, StoreError> {
        self.mutate(TableChange::Tasks, |d| Ok(d.insert_task(task, created_at)))
            .await
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, StoreError> {
        self.mutate(TableChange::Tasks, |d| d.update_task(id, update))
            .await
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(TableChange::Tasks, |d| d.delete_task(id)).await
    }

    async fn open_session(&self, task_id: &str, start_time: i64) -> Result<TimeSession, StoreError> {
        self.mutate(TableChange::Tasks, |d| d.open_session(task_id, start_time))
            .await
    }

    async fn close_session(&self, session_id: &str, end_time: i64) -> Result<(), StoreError> {
        self.mutate(TableChange::Tasks, |d| d.close_session(session_id, end_time))
            .await
    }

    async fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<(), StoreError> {
        self.mutate(TableChange::Tasks, |d| d.set_task_status(task_id, status))
            .await
    }

    async fn list_open_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TimeSession>, StoreError> {
        self.read(|d| d.open_sessions_for_user(user_id)).await
    }
}

impl ProfileRepository for JsonFileStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.read(Dataset::list_profiles).await
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        self.read(|d| d.get_profile(id)).await
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<Profile, StoreError> {
        self.mutate(TableChange::Profiles, |d| d.update_profile(id, update))
            .await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<(), StoreError> {
        self.mutate(TableChange::Profiles, |d| d.set_active(id, active))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_task(user: &str) -> NewTask {
        NewTask {
            user_id: user.into(),
            title: "Design homepage banner".into(),
            description: "Hero section graphics".into(),
            category: "Design".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            target_minutes: Some(45),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        assert_eq!(store.load().await.unwrap(), Dataset::default());
    }

    #[tokio::test]
    async fn test_writes_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let store = JsonFileStore::new(&path);
        let task = store.insert_task(new_task("u1"), 42).await.unwrap();
        store.open_session(&task.id, 1000).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        let open = reopened.list_open_sessions_for_user("u1").await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].start_time, 1000);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.list_tasks(&TaskQuery::all()).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::new(&path);
        store.insert_task(new_task("u1"), 0).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, raw.replace("Not Started", "Paused")).unwrap();

        assert!(matches!(
            store.list_tasks(&TaskQuery::all()).await,
            Err(StoreError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_detects_write_from_another_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let watcher = JsonFileStore::new(&path);
        let mut sub = watcher.changes().subscribe();

        assert!(!watcher.check_external_change().await.unwrap());
        assert!(!watcher.check_external_change().await.unwrap());

        let other = JsonFileStore::new(&path);
        other.insert_task(new_task("u1"), 0).await.unwrap();

        assert!(watcher.check_external_change().await.unwrap());
        assert_eq!(sub.invalidated().await, Some(TableChange::Tasks));
        assert_eq!(sub.invalidated().await, Some(TableChange::Profiles));
        assert!(!watcher.check_external_change().await.unwrap());
    }

    #[tokio::test]
    async fn test_own_writes_are_not_external() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        store.insert_task(new_task("u1"), 0).await.unwrap();
        let mut sub = store.changes().subscribe();

        assert!(!store.check_external_change().await.unwrap());
        store.insert_task(new_task("u1"), 1).await.unwrap();
        assert!(!store.check_external_change().await.unwrap());
        assert_eq!(sub.invalidated().await, Some(TableChange::Tasks));
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        store.insert_task(new_task("u1"), 0).await.unwrap();
        let before = store.load().await.unwrap();

        assert!(store.set_task_status("nope", TaskStatus::Finished).await.is_err());
        assert_eq!(store.load().await.unwrap(), before);
    }
}
