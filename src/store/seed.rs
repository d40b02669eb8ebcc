//! Demo data: one admin, four employees and a few sample tasks.

use chrono::NaiveDate;

use crate::types::{EmployeeType, NewTask, Profile, Role, TaskStatus};

use super::Dataset;

const HOUR_MS: i64 = 3_600_000;

/// Builds an active profile whose email is derived from the id.
pub fn profile(id: &str, name: &str, role: Role, employee_type: EmployeeType) -> Profile {
    Profile {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@demo.com"),
        role,
        employee_type,
        is_active: true,
        created_at: 0,
    }
}

/// Builds the demo dataset as of `now`.
///
/// Started sample tasks get one session that began an hour ago; the
/// finished one was closed half an hour ago.
pub fn demo_dataset(now: i64, today: NaiveDate) -> Dataset {
    let mut data = Dataset::default();
    for p in [
        profile("admin", "Admin User", Role::Admin, EmployeeType::Other),
        profile("john", "John Developer", Role::Employee, EmployeeType::Developer),
        profile("sarah", "Sarah Designer", Role::Employee, EmployeeType::GraphicDesigner),
        profile("mike", "Mike Marketer", Role::Employee, EmployeeType::DigitalMarketer),
        profile("lisa", "Lisa Writer", Role::Employee, EmployeeType::ContentWriter),
    ] {
        data.insert_profile(Profile {
            created_at: now,
            ..p
        });
    }

    let samples = [
        ("john", "Build login page", "Create auth UI with validation", "Development", TaskStatus::InProgress),
        ("john", "Fix navigation bug", "Resolve sidebar collapse on mobile", "Development", TaskStatus::NotStarted),
        ("sarah", "Design homepage banner", "Hero section graphics", "Design", TaskStatus::InProgress),
        ("mike", "Social media campaign", "Plan product launch posts", "Marketing", TaskStatus::NotStarted),
        ("lisa", "Write blog article", "Industry trends Q1", "Content", TaskStatus::Finished),
    ];

    for (offset, (user, title, description, category, status)) in samples.into_iter().enumerate() {
        let task = data.insert_task(
            NewTask {
                user_id: user.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                date: today,
                target_minutes: None,
            },
            now - offset as i64,
        );
        if status == TaskStatus::NotStarted {
            continue;
        }
        // Infallible: the task was inserted just above.
        if let Ok(session) = data.open_session(&task.id, now - HOUR_MS) {
            if status == TaskStatus::Finished {
                let _ = data.close_session(&session.id, now - HOUR_MS / 2);
            }
        }
        let _ = data.set_task_status(&task.id, status);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ledger;

    fn seeded() -> Dataset {
        demo_dataset(10 * HOUR_MS, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn test_demo_profiles() {
        let data = seeded();
        assert_eq!(data.profiles.len(), 5);
        assert_eq!(data.profiles.iter().filter(|p| p.role == Role::Admin).count(), 1);
        assert_eq!(data.get_profile("sarah").unwrap().email, "sarah@demo.com");
    }

    #[test]
    fn test_demo_tasks_respect_single_open_session() {
        let data = seeded();
        assert_eq!(data.tasks.len(), 5);
        for user in ["john", "sarah", "mike", "lisa"] {
            assert!(data.open_sessions_for_user(user).len() <= 1);
        }
    }

    #[test]
    fn test_finished_demo_task_has_half_hour_logged() {
        let data = seeded();
        let task = data
            .tasks
            .iter()
            .find(|t| t.status == TaskStatus::Finished)
            .unwrap();
        assert!(!task.is_running());
        assert_eq!(ledger::elapsed_ms(&task.time_sessions, 0), 1_800_000);
    }
}
