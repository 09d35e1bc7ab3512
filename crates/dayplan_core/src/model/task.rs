use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration assumed for a flexible task that has none recorded.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Task category as stored by the task collection.
///
/// The stored labels are part of the data contract with existing records, so
/// they are kept verbatim. Anything unrecognized is preserved in `Other` and
/// ranked last by the planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Todo,
    UrgentTodo,
    Admin,
    Homework,
    FixedBlocker,
    PersonalBlocker,
    Other(String),
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Self::Todo => "To-Do",
            Self::UrgentTodo => "To-Do - dringend",
            Self::Admin => "Admin",
            Self::Homework => "homework",
            Self::FixedBlocker => "Terminblocker",
            Self::PersonalBlocker => "personal-blocker",
            Self::Other(label) => label,
        }
    }

    /// Accepts the stored labels as well as the short names used on the
    /// command line (`todo`, `urgent`, `admin`, `homework`, `blocker`,
    /// `personal`).
    pub fn from_label(raw: &str) -> Self {
        match raw.trim() {
            "To-Do" | "todo" => Self::Todo,
            "To-Do - dringend" | "urgent" => Self::UrgentTodo,
            "Admin" | "admin" => Self::Admin,
            "homework" => Self::Homework,
            "Terminblocker" | "blocker" => Self::FixedBlocker,
            "personal-blocker" | "personal" => Self::PersonalBlocker,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_blocker(&self) -> bool {
        matches!(self, Self::FixedBlocker | Self::PersonalBlocker)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new<T: Into<String>>(title: T, category: Category) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            category,
            priority: 0,
            deadline: None,
            duration: None,
            frequency: String::new(),
            done: false,
        }
    }

    /// Minutes the planner tries to place for this task.
    ///
    /// A missing or zero duration means one hour; an explicit negative value
    /// is floored to a single minute.
    pub fn planned_minutes(&self) -> u32 {
        let minutes = match self.duration {
            Some(0) | None => DEFAULT_DURATION_MINUTES,
            Some(value) => value,
        };
        u32::try_from(minutes.max(1)).unwrap_or(u32::MAX)
    }
}
