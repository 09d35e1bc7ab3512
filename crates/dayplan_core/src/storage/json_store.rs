use crate::error::AppError;
use crate::model::Task;
use crate::repository::{TaskRepository, generate_id, remove_task, replace_task};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "DAYPLAN_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("dayplan").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("dayplan")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredTasks =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    Ok(stored.tasks)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}

/// Task repository backed by a single JSON file, read and rewritten on every
/// call.
#[derive(Debug, Clone)]
pub struct JsonTaskRepository {
    path: PathBuf,
}

impl JsonTaskRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_path()?))
    }
}

impl TaskRepository for JsonTaskRepository {
    fn list(&self) -> Result<Vec<Task>, AppError> {
        load_tasks(&self.path)
    }

    fn add(&mut self, mut task: Task) -> Result<String, AppError> {
        let id = match task.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => generate_id(),
        };
        task.id = Some(id.clone());

        let mut tasks = load_tasks(&self.path)?;
        tasks.push(task);
        save_tasks(&self.path, &tasks)?;
        tracing::debug!(id = %id, path = %self.path.display(), "task added");

        Ok(id)
    }

    fn update(&mut self, task: &Task) -> Result<(), AppError> {
        let mut tasks = load_tasks(&self.path)?;
        replace_task(&mut tasks, task)?;
        save_tasks(&self.path, &tasks)?;
        tracing::debug!(id = ?task.id, "task updated");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<Task, AppError> {
        let mut tasks = load_tasks(&self.path)?;
        let removed = remove_task(&mut tasks, id)?;
        save_tasks(&self.path, &tasks)?;
        tracing::debug!(id, "task deleted");
        Ok(removed)
    }
}
