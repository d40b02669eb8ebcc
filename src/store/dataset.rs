//! In-process table state shared by the memory and file stores.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{
    NewTask, Profile, ProfileUpdate, Task, TaskStatus, TaskUpdate, TimeSession,
};

use super::{StoreError, TaskQuery};

/// All rows of the profiles, tasks and time-sessions tables.
///
/// Sessions are kept embedded in their task, which is also the shape every
/// read returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Dataset {
    /// Returns matching tasks, newest first.
    pub fn list_tasks(&self, query: &TaskQuery) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn insert_task(&mut self, new: NewTask, created_at: i64) -> Task {
        let task = Task {
            id: new_id(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            category: new.category,
            date: new.date,
            target_minutes: new.target_minutes,
            status: TaskStatus::NotStarted,
            time_sessions: Vec::new(),
            created_at,
        };
        self.tasks.push(task.clone());
        task
    }

    pub fn update_task(&mut self, id: &str, update: &TaskUpdate) -> Result<Task, StoreError> {
        let task = self.task_mut(id)?;
        update.apply_to(task);
        Ok(task.clone())
    }

    /// Removes a task together with its sessions.
    pub fn delete_task(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(StoreError::task_not_found(id));
        }
        Ok(())
    }

    pub fn open_session(&mut self, task_id: &str, start_time: i64) -> Result<TimeSession, StoreError> {
        let task = self.task_mut(task_id)?;
        let session = TimeSession {
            id: new_id(),
            task_id: task.id.clone(),
            start_time,
            end_time: None,
        };
        task.time_sessions.push(session.clone());
        Ok(session)
    }

    /// Sets a session's end time. A session is closed exactly once.
    pub fn close_session(&mut self, session_id: &str, end_time: i64) -> Result<(), StoreError> {
        let session = self
            .tasks
            .iter_mut()
            .flat_map(|t| t.time_sessions.iter_mut())
            .find(|s| s.id == session_id)
            .ok_or_else(|| StoreError::session_not_found(session_id))?;

        if session.end_time.is_some() {
            return Err(StoreError::Conflict(format!(
                "session '{session_id}' is already closed"
            )));
        }
        if end_time < session.start_time {
            return Err(StoreError::Conflict(format!(
                "session '{session_id}' cannot end before it starts"
            )));
        }
        session.end_time = Some(end_time);
        Ok(())
    }

    pub fn set_task_status(&mut self, task_id: &str, status: TaskStatus) -> Result<(), StoreError> {
        self.task_mut(task_id)?.status = status;
        Ok(())
    }

    /// Returns every open session on any task owned by the user.
    pub fn open_sessions_for_user(&self, user_id: &str) -> Vec<TimeSession> {
        self.tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .flat_map(|t| t.open_sessions().cloned())
            .collect()
    }

    pub fn list_profiles(&self) -> Vec<Profile> {
        self.profiles.clone()
    }

    pub fn get_profile(&self, id: &str) -> Option<Profile> {
        self.profiles.iter().find(|p| p.id == id).cloned()
    }

    pub fn insert_profile(&mut self, profile: Profile) {
        self.profiles.push(profile);
    }

    pub fn update_profile(&mut self, id: &str, update: &ProfileUpdate) -> Result<Profile, StoreError> {
        let profile = self.profile_mut(id)?;
        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(employee_type) = update.employee_type {
            profile.employee_type = employee_type;
        }
        Ok(profile.clone())
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> Result<(), StoreError> {
        self.profile_mut(id)?.is_active = active;
        Ok(())
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    fn profile_mut(&mut self, id: &str) -> Result<&mut Profile, StoreError> {
        self.profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::profile_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_task(user: &str, title: &str) -> NewTask {
        NewTask {
            user_id: user.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: "Development".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            target_minutes: None,
        }
    }

    #[test]
    fn test_insert_starts_not_started_without_sessions() {
        let mut data = Dataset::default();
        let task = data.insert_task(new_task("u1", "A"), 10);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert!(task.time_sessions.is_empty());
        assert_eq!(data.get_task(&task.id), Some(task));
    }

    #[test]
    fn test_list_is_newest_first_and_filtered() {
        let mut data = Dataset::default();
        data.insert_task(new_task("u1", "old"), 1);
        data.insert_task(new_task("u2", "other"), 2);
        data.insert_task(new_task("u1", "new"), 3);

        let titles: Vec<_> = data
            .list_tasks(&TaskQuery::for_user("u1"))
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[test]
    fn test_close_session_only_once() {
        let mut data = Dataset::default();
        let task = data.insert_task(new_task("u1", "A"), 0);
        let session = data.open_session(&task.id, 1000).unwrap();

        data.close_session(&session.id, 4000).unwrap();
        let again = data.close_session(&session.id, 5000);
        assert!(matches!(again, Err(StoreError::Conflict(_))));
        assert_eq!(
            data.get_task(&task.id).unwrap().time_sessions[0].end_time,
            Some(4000)
        );
    }

    #[test]
    fn test_close_session_rejects_end_before_start() {
        let mut data = Dataset::default();
        let task = data.insert_task(new_task("u1", "A"), 0);
        let session = data.open_session(&task.id, 1000).unwrap();
        assert!(data.close_session(&session.id, 999).is_err());
    }

    #[test]
    fn test_open_sessions_scoped_to_user() {
        let mut data = Dataset::default();
        let a = data.insert_task(new_task("u1", "A"), 0);
        let b = data.insert_task(new_task("u2", "B"), 0);
        data.open_session(&a.id, 1).unwrap();
        data.open_session(&b.id, 1).unwrap();

        let open = data.open_sessions_for_user("u1");
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].task_id, a.id);
    }

    #[test]
    fn test_delete_cascades_sessions() {
        let mut data = Dataset::default();
        let a = data.insert_task(new_task("u1", "A"), 0);
        data.open_session(&a.id, 1).unwrap();
        data.delete_task(&a.id).unwrap();

        assert!(data.open_sessions_for_user("u1").is_empty());
        assert!(data.delete_task(&a.id).unwrap_err().is_not_found());
    }
}
