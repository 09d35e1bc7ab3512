use crate::error::AppError;
use crate::model::Task;

/// Storage the planner reads tasks from and the task API writes them to.
pub trait TaskRepository {
    fn list(&self) -> Result<Vec<Task>, AppError>;

    /// Stores `task`, assigning an id when it has none, and returns the id.
    fn add(&mut self, task: Task) -> Result<String, AppError>;

    /// Replaces the stored task with the same id.
    fn update(&mut self, task: &Task) -> Result<(), AppError>;

    fn delete(&mut self, id: &str) -> Result<Task, AppError>;
}

pub(crate) fn generate_id() -> String {
    format!(
        "task-{}",
        time::OffsetDateTime::now_utc().unix_timestamp_nanos()
    )
}

pub(crate) fn require_id(task: &Task) -> Result<&str, AppError> {
    match task.id.as_deref() {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(AppError::invalid_input("task has no id")),
    }
}

/// Applies an update to an in-memory task list.
pub(crate) fn replace_task(tasks: &mut [Task], task: &Task) -> Result<(), AppError> {
    let id = require_id(task)?;
    let slot = tasks
        .iter_mut()
        .find(|stored| stored.id.as_deref() == Some(id))
        .ok_or_else(|| AppError::not_found(format!("task {id} not found")))?;
    *slot = task.clone();
    Ok(())
}

/// Removes a task from an in-memory task list.
pub(crate) fn remove_task(tasks: &mut Vec<Task>, id: &str) -> Result<Task, AppError> {
    let index = tasks
        .iter()
        .position(|stored| stored.id.as_deref() == Some(id))
        .ok_or_else(|| AppError::not_found(format!("task {id} not found")))?;
    Ok(tasks.remove(index))
}

/// Keeps tasks in a `Vec`; used by tests and embedders.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Vec<Task>,
    next_id: u64,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks, next_id: 0 }
    }

    fn contains(&self, id: &str) -> bool {
        self.tasks.iter().any(|task| task.id.as_deref() == Some(id))
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn list(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.clone())
    }

    fn add(&mut self, mut task: Task) -> Result<String, AppError> {
        let id = match task.id.as_deref() {
            Some(id) if !id.trim().is_empty() => {
                if self.contains(id) {
                    return Err(AppError::invalid_input(format!("task {id} already exists")));
                }
                id.to_string()
            }
            _ => loop {
                self.next_id += 1;
                let candidate = format!("task-{}", self.next_id);
                if !self.contains(&candidate) {
                    break candidate;
                }
            },
        };
        task.id = Some(id.clone());
        self.tasks.push(task);
        Ok(id)
    }

    fn update(&mut self, task: &Task) -> Result<(), AppError> {
        replace_task(&mut self.tasks, task)
    }

    fn delete(&mut self, id: &str) -> Result<Task, AppError> {
        remove_task(&mut self.tasks, id)
    }
}
