use crate::config::{self, ConfigOverrides, PlannerSettings};
use crate::error::AppError;
use crate::model::{Category, Task};
use crate::planner::{self, DayPlan};
use crate::repository::TaskRepository;
use crate::storage::json_store::JsonTaskRepository;
use crate::time_range::try_parse_time;
use time::OffsetDateTime;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: i64,
    pub deadline: Option<String>,
    pub duration: Option<i64>,
    pub frequency: String,
}

/// Fields to change on an existing task; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<i64>,
    pub deadline: Option<String>,
    pub duration: Option<i64>,
    pub frequency: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlanResult {
    pub plan: DayPlan,
    /// Settings after overrides and blocker recovery.
    pub settings: PlannerSettings,
    /// Set when the config file existed but could not be used.
    pub config_error: Option<AppError>,
}

pub fn add_task(new_task: NewTask) -> Result<Task, AppError> {
    let mut repo = JsonTaskRepository::from_env()?;
    add_task_with_repo(&mut repo, new_task)
}

pub fn edit_task(id: &str, patch: TaskPatch) -> Result<Task, AppError> {
    let mut repo = JsonTaskRepository::from_env()?;
    edit_task_with_repo(&mut repo, id, patch)
}

pub fn delete_task(id: &str) -> Result<Task, AppError> {
    let mut repo = JsonTaskRepository::from_env()?;
    delete_task_with_repo(&mut repo, id)
}

pub fn complete_task(id: &str) -> Result<Task, AppError> {
    let mut repo = JsonTaskRepository::from_env()?;
    complete_task_with_repo(&mut repo, id)
}

pub fn list_tasks() -> Result<Vec<Task>, AppError> {
    JsonTaskRepository::from_env()?.list()
}

pub fn set_day_block(title: &str, start: &str, end: &str, personal: bool) -> Result<Task, AppError> {
    let mut repo = JsonTaskRepository::from_env()?;
    set_day_block_with_repo(&mut repo, title, start, end, personal)
}

pub fn plan(overrides: &ConfigOverrides, now: OffsetDateTime) -> Result<PlanResult, AppError> {
    let repo = JsonTaskRepository::from_env()?;
    let loaded = config::load_config_with_fallback();
    let mut result = plan_with_repo(&repo, &loaded.settings, overrides, now)?;
    result.config_error = loaded.error;
    Ok(result)
}

pub fn current_settings(overrides: &ConfigOverrides) -> Result<PlannerSettings, AppError> {
    let repo = JsonTaskRepository::from_env()?;
    let loaded = config::load_config_with_fallback();
    let (_, settings) = effective_settings(&repo, &loaded.settings, overrides)?;
    Ok(settings)
}

pub fn add_task_with_repo<R: TaskRepository>(
    repo: &mut R,
    new_task: NewTask,
) -> Result<Task, AppError> {
    let title = required_title(&new_task.title)?;

    let mut task = Task {
        description: new_task.description,
        priority: new_task.priority,
        deadline: new_task.deadline,
        duration: new_task.duration,
        frequency: new_task.frequency,
        ..Task::new(title, new_task.category)
    };
    let id = repo.add(task.clone())?;
    task.id = Some(id);

    Ok(task)
}

pub fn edit_task_with_repo<R: TaskRepository>(
    repo: &mut R,
    id: &str,
    patch: TaskPatch,
) -> Result<Task, AppError> {
    let mut task = find_task(repo, id)?;

    if let Some(title) = patch.title {
        task.title = required_title(&title)?;
    }
    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(category) = patch.category {
        task.category = category;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(deadline) = patch.deadline {
        task.deadline = Some(deadline);
    }
    if let Some(duration) = patch.duration {
        task.duration = Some(duration);
    }
    if let Some(frequency) = patch.frequency {
        task.frequency = frequency;
    }

    repo.update(&task)?;
    Ok(task)
}

pub fn delete_task_with_repo<R: TaskRepository>(repo: &mut R, id: &str) -> Result<Task, AppError> {
    let trimmed_id = required_id(id)?;
    repo.delete(trimmed_id)
}

pub fn complete_task_with_repo<R: TaskRepository>(
    repo: &mut R,
    id: &str,
) -> Result<Task, AppError> {
    let mut task = find_task(repo, id)?;
    if task.done {
        return Err(AppError::invalid_input("task already completed"));
    }

    task.done = true;
    repo.update(&task)?;
    Ok(task)
}

/// Creates the blocker titled `title`, or moves it if it already exists.
pub fn set_day_block_with_repo<R: TaskRepository>(
    repo: &mut R,
    title: &str,
    start: &str,
    end: &str,
    personal: bool,
) -> Result<Task, AppError> {
    let title = required_title(title)?;
    let start_minutes = required_clock(start)?;
    let end_minutes = required_clock(end)?;
    if end_minutes <= start_minutes {
        return Err(AppError::invalid_input("end must be after start"));
    }

    let category = if personal {
        Category::PersonalBlocker
    } else {
        Category::FixedBlocker
    };

    let existing = repo
        .list()?
        .into_iter()
        .find(|task| task.title == title && task.category == category);

    match existing {
        Some(mut task) => {
            task.description = format!("{} - {}", start.trim(), end.trim());
            repo.update(&task)?;
            Ok(task)
        }
        None => {
            let mut task =
                planner::day_structure_task(&title, start.trim(), end.trim(), category);
            let id = repo.add(task.clone())?;
            task.id = Some(id);
            Ok(task)
        }
    }
}

/// Settings for a planning pass: `base`, then `overrides`, then the day
/// frame recovered from stored blockers.
pub fn effective_settings<R: TaskRepository>(
    repo: &R,
    base: &PlannerSettings,
    overrides: &ConfigOverrides,
) -> Result<(Vec<Task>, PlannerSettings), AppError> {
    let tasks = repo.list()?;
    let merged = config::merge_overrides(base, overrides);
    let settings = planner::restore_from_tasks(&merged, &tasks);
    Ok((tasks, settings))
}

pub fn plan_with_repo<R: TaskRepository>(
    repo: &R,
    base: &PlannerSettings,
    overrides: &ConfigOverrides,
    now: OffsetDateTime,
) -> Result<PlanResult, AppError> {
    let (tasks, settings) = effective_settings(repo, base, overrides)?;
    let plan = planner::build_plan(&tasks, &settings, now);

    Ok(PlanResult {
        plan,
        settings,
        config_error: None,
    })
}

fn find_task<R: TaskRepository>(repo: &R, id: &str) -> Result<Task, AppError> {
    let trimmed_id = required_id(id)?;
    repo.list()?
        .into_iter()
        .find(|task| task.id.as_deref() == Some(trimmed_id))
        .ok_or_else(|| AppError::not_found("task not found"))
}

fn required_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed)
}

fn required_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    Ok(trimmed.to_string())
}

fn required_clock(value: &str) -> Result<u32, AppError> {
    try_parse_time(value.trim())
        .ok_or_else(|| AppError::invalid_input(format!("'{}' is not a HH:MM time", value.trim())))
}

#[cfg(test)]
mod tests {
    use super::{
        NewTask, TaskPatch, add_task_with_repo, complete_task_with_repo, delete_task_with_repo,
        edit_task_with_repo, effective_settings, plan_with_repo, set_day_block_with_repo,
    };
    use crate::config::{ConfigOverrides, PlannerSettings};
    use crate::model::{Category, Task};
    use crate::repository::{InMemoryTaskRepository, TaskRepository};
    use time::macros::datetime;

    fn new_task(title: &str, category: Category, duration: i64) -> NewTask {
        NewTask {
            title: title.to_string(),
            category,
            duration: Some(duration),
            ..NewTask::default()
        }
    }

    #[test]
    fn add_task_rejects_blank_title() {
        let mut repo = InMemoryTaskRepository::new();
        let err = add_task_with_repo(&mut repo, new_task("  ", Category::Todo, 30)).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn add_task_trims_title_and_assigns_id() {
        let mut repo = InMemoryTaskRepository::new();
        let task = add_task_with_repo(&mut repo, new_task("  essay ", Category::Homework, 90))
            .unwrap();

        assert_eq!(task.title, "essay");
        assert_eq!(task.id.as_deref(), Some("task-1"));
        assert_eq!(repo.list().unwrap(), [task]);
    }

    #[test]
    fn edit_task_applies_only_given_fields() {
        let mut repo = InMemoryTaskRepository::new();
        let task = add_task_with_repo(&mut repo, new_task("essay", Category::Homework, 90))
            .unwrap();
        let id = task.id.unwrap();

        let edited = edit_task_with_repo(
            &mut repo,
            &id,
            TaskPatch {
                duration: Some(45),
                deadline: Some("2025-03-12".into()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

        assert_eq!(edited.title, "essay");
        assert_eq!(edited.category, Category::Homework);
        assert_eq!(edited.duration, Some(45));
        assert_eq!(repo.list().unwrap()[0].deadline.as_deref(), Some("2025-03-12"));
    }

    #[test]
    fn edit_task_rejects_unknown_and_blank_ids() {
        let mut repo = InMemoryTaskRepository::new();

        let err = edit_task_with_repo(&mut repo, "task-7", TaskPatch::default()).unwrap_err();
        assert_eq!(err.code(), "not_found");

        let err = edit_task_with_repo(&mut repo, " ", TaskPatch::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn complete_task_marks_done_once() {
        let mut repo = InMemoryTaskRepository::new();
        let id = add_task_with_repo(&mut repo, new_task("a", Category::Todo, 30))
            .unwrap()
            .id
            .unwrap();

        let done = complete_task_with_repo(&mut repo, &id).unwrap();
        assert!(done.done);

        let err = complete_task_with_repo(&mut repo, &id).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(err.message().contains("already completed"));
    }

    #[test]
    fn delete_task_removes_record() {
        let mut repo = InMemoryTaskRepository::new();
        let id = add_task_with_repo(&mut repo, new_task("a", Category::Todo, 30))
            .unwrap()
            .id
            .unwrap();

        let removed = delete_task_with_repo(&mut repo, &id).unwrap();

        assert_eq!(removed.title, "a");
        assert_eq!(
            delete_task_with_repo(&mut repo, &id).unwrap_err().code(),
            "not_found"
        );
    }

    #[test]
    fn set_day_block_creates_then_moves_blocker() {
        let mut repo = InMemoryTaskRepository::new();

        let created =
            set_day_block_with_repo(&mut repo, "Mittagessen", "12:00", "12:30", false).unwrap();
        assert_eq!(created.description, "12:00 - 12:30");
        assert_eq!(created.category, Category::FixedBlocker);

        let moved =
            set_day_block_with_repo(&mut repo, "Mittagessen", "12:30", "13:15", false).unwrap();
        assert_eq!(moved.id, created.id);

        let stored = repo.list().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].description, "12:30 - 13:15");
    }

    #[test]
    fn set_day_block_validates_clocks() {
        let mut repo = InMemoryTaskRepository::new();

        let err = set_day_block_with_repo(&mut repo, "Gym", "18:00", "noon", true).unwrap_err();
        assert_eq!(err.code(), "invalid_input");

        let err = set_day_block_with_repo(&mut repo, "Gym", "18:00", "17:00", true).unwrap_err();
        assert!(err.message().contains("after start"));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn effective_settings_prefer_stored_blockers_over_overrides() {
        let mut repo = InMemoryTaskRepository::new();
        set_day_block_with_repo(&mut repo, "Arbeitstag", "09:00", "15:00", false).unwrap();
        let overrides = ConfigOverrides {
            work_start: Some("06:00".into()),
            dinner: Some("20:00".into()),
            ..ConfigOverrides::default()
        };

        let (tasks, settings) =
            effective_settings(&repo, &PlannerSettings::default(), &overrides).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(settings.work_start, "09:00");
        assert_eq!(settings.work_end, "15:00");
        assert_eq!(settings.dinner, "20:00");
    }

    #[test]
    fn plan_with_repo_uses_stored_tasks() {
        let repo = InMemoryTaskRepository::with_tasks(vec![
            Task {
                description: "08:00 - 12:00".into(),
                ..Task::new("Arbeitstag", Category::FixedBlocker)
            },
            Task {
                duration: Some(30),
                ..Task::new("mail", Category::Admin)
            },
        ]);
        let overrides = ConfigOverrides {
            days: Some(2),
            ..ConfigOverrides::default()
        };

        let result = plan_with_repo(
            &repo,
            &PlannerSettings::default(),
            &overrides,
            datetime!(2025-03-10 07:00 UTC),
        )
        .unwrap();

        assert_eq!(result.settings.work_end, "12:00");
        assert_eq!(result.plan.days, 2);
        assert_eq!(result.plan.items.len(), 1);
        assert_eq!(
            (result.plan.items[0].start, result.plan.items[0].end),
            (480, 510)
        );
        assert!(result.config_error.is_none());
    }
}
