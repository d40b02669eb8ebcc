//! Live team status: who is working on what.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Profile, Role, Task, TaskId, TaskStatus, UserId};

/// The fields of a task shown on a member card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBrief {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl From<&Task> for TaskBrief {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
        }
    }
}

/// One member's current activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberActivity {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    /// The task with an open session, if any
    pub current: Option<TaskBrief>,
    /// `In Progress` tasks that are paused
    pub in_progress: Vec<TaskBrief>,
    pub todo: Vec<TaskBrief>,
    /// Tasks dated today that are finished
    pub completed_today: Vec<TaskBrief>,
}

impl MemberActivity {
    pub fn is_working(&self) -> bool {
        self.current.is_some()
    }
}

/// Activity of every active member, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamActivity {
    pub members: Vec<MemberActivity>,
}

impl TeamActivity {
    pub fn compute(tasks: &[Task], profiles: &[Profile], today: NaiveDate) -> Self {
        let mut members: Vec<MemberActivity> = profiles
            .iter()
            .filter(|p| p.is_active)
            .map(|p| member(p, tasks, today))
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Self { members }
    }

    pub fn working(&self) -> impl Iterator<Item = &MemberActivity> {
        self.members.iter().filter(|m| m.is_working())
    }

    pub fn idle(&self) -> impl Iterator<Item = &MemberActivity> {
        self.members.iter().filter(|m| !m.is_working())
    }

    /// Every task finished today, with the name of the member who did it.
    pub fn completed(&self) -> Vec<(&str, &TaskBrief)> {
        self.members
            .iter()
            .flat_map(|m| m.completed_today.iter().map(move |t| (m.name.as_str(), t)))
            .collect()
    }
}

fn member(profile: &Profile, tasks: &[Task], today: NaiveDate) -> MemberActivity {
    let mut activity = MemberActivity {
        user_id: profile.id.clone(),
        name: profile.name.clone(),
        role: profile.role,
        current: None,
        in_progress: Vec::new(),
        todo: Vec::new(),
        completed_today: Vec::new(),
    };

    for task in tasks.iter().filter(|t| t.user_id == profile.id) {
        match task.status {
            TaskStatus::InProgress if task.is_running() && activity.current.is_none() => {
                activity.current = Some(task.into());
            }
            TaskStatus::InProgress => activity.in_progress.push(task.into()),
            TaskStatus::NotStarted => activity.todo.push(task.into()),
            TaskStatus::Finished if task.date == today => {
                activity.completed_today.push(task.into())
            }
            TaskStatus::Finished => {}
        }
    }
    activity
}
