//! Input checks for task and profile edits.
//!
//! Each function returns the normalized (trimmed) value so callers store
//! exactly what was validated.

use crate::error::{ValidationError, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use crate::types::{NewTask, ProfileUpdate, TaskUpdate};

pub fn title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

pub fn description(raw: &str) -> Result<String, ValidationError> {
    let description = raw.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(description.to_string())
}

pub fn category(raw: &str) -> Result<String, ValidationError> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(category.to_string())
}

pub fn target_minutes(target: Option<u32>) -> Result<Option<u32>, ValidationError> {
    match target {
        Some(0) => Err(ValidationError::InvalidTarget),
        other => Ok(other),
    }
}

pub fn name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

pub fn new_task(task: NewTask) -> Result<NewTask, ValidationError> {
    Ok(NewTask {
        title: title(&task.title)?,
        description: description(&task.description)?,
        category: category(&task.category)?,
        target_minutes: target_minutes(task.target_minutes)?,
        ..task
    })
}

pub fn task_update(update: TaskUpdate) -> Result<TaskUpdate, ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::NothingToUpdate);
    }
    Ok(TaskUpdate {
        title: update.title.as_deref().map(title).transpose()?,
        description: update.description.as_deref().map(description).transpose()?,
        category: update.category.as_deref().map(category).transpose()?,
        date: update.date,
        target_minutes: update.target_minutes.map(target_minutes).transpose()?,
    })
}

pub fn profile_update(update: ProfileUpdate) -> Result<ProfileUpdate, ValidationError> {
    if update.name.is_none() && update.employee_type.is_none() {
        return Err(ValidationError::NothingToUpdate);
    }
    Ok(ProfileUpdate {
        name: update.name.as_deref().map(name).transpose()?,
        employee_type: update.employee_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_task(title: &str) -> NewTask {
        NewTask {
            user_id: "u1".into(),
            title: title.into(),
            description: "  notes  ".into(),
            category: " Design ".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            target_minutes: None,
        }
    }

    #[test]
    fn test_new_task_is_trimmed() {
        let task = new_task(raw_task("  Banner  ")).unwrap();
        assert_eq!(task.title, "Banner");
        assert_eq!(task.description, "notes");
        assert_eq!(task.category, "Design");
    }

    #[test]
    fn test_blank_title_rejected() {
        assert_eq!(new_task(raw_task("   ")), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_title_length_counts_characters() {
        assert!(title(&"é".repeat(MAX_TITLE_LEN)).is_ok());
        assert_eq!(
            title(&"a".repeat(MAX_TITLE_LEN + 1)),
            Err(ValidationError::TitleTooLong)
        );
    }

    #[test]
    fn test_description_limit() {
        assert!(description(&"x".repeat(MAX_DESCRIPTION_LEN)).is_ok());
        assert_eq!(
            description(&"x".repeat(MAX_DESCRIPTION_LEN + 1)),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn test_zero_target_rejected() {
        assert_eq!(target_minutes(Some(0)), Err(ValidationError::InvalidTarget));
        assert_eq!(target_minutes(Some(1)), Ok(Some(1)));
        assert_eq!(target_minutes(None), Ok(None));
    }

    #[test]
    fn test_update_validation() {
        assert_eq!(
            task_update(TaskUpdate::default()),
            Err(ValidationError::NothingToUpdate)
        );
        let cleared = task_update(TaskUpdate {
            target_minutes: Some(None),
            ..TaskUpdate::default()
        })
        .unwrap();
        assert_eq!(cleared.target_minutes, Some(None));

        let bad = TaskUpdate {
            category: Some(" ".into()),
            ..TaskUpdate::default()
        };
        assert_eq!(task_update(bad), Err(ValidationError::EmptyCategory));
    }

    #[test]
    fn test_profile_update_validation() {
        assert_eq!(
            profile_update(ProfileUpdate::default()),
            Err(ValidationError::NothingToUpdate)
        );
        let blank = ProfileUpdate {
            name: Some("  ".into()),
            ..ProfileUpdate::default()
        };
        assert_eq!(profile_update(blank), Err(ValidationError::EmptyName));
    }
}
