use crate::config::PlannerSettings;
use crate::model::{Category, Task};
use crate::time_range::{MinuteRange, format_minutes, parse_range};

pub const WORKDAY_TITLE: &str = "Arbeitstag";
pub const BREAKFAST_TITLE: &str = "Frühstück";
pub const LUNCH_TITLE: &str = "Mittagessen";
pub const DINNER_TITLE: &str = "Abendessen";

/// Range of the first fixed blocker titled `title`, if it parses.
pub fn blocker_range(tasks: &[Task], title: &str) -> Option<MinuteRange> {
    let task = tasks
        .iter()
        .find(|task| task.title == title && task.category == Category::FixedBlocker)?;
    parse_range(&task.description)
}

/// Overrides the built-in day frame with times recovered from stored
/// blockers. Absent or unparseable blockers leave the incoming value alone.
pub fn restore_from_tasks(settings: &PlannerSettings, tasks: &[Task]) -> PlannerSettings {
    let mut restored = settings.clone();

    if let Some(range) = blocker_range(tasks, WORKDAY_TITLE) {
        restored = restored.with_work_window(range.start, range.end);
    }

    let meals = [
        (BREAKFAST_TITLE, &mut restored.breakfast),
        (LUNCH_TITLE, &mut restored.lunch),
        (DINNER_TITLE, &mut restored.dinner),
    ];
    for (title, clock) in meals {
        if let Some(range) = blocker_range(tasks, title) {
            *clock = format_minutes(range.start);
        }
    }

    restored
}

/// Builds the stored record for one entry of the day structure.
pub fn day_structure_task(title: &str, start: &str, end: &str, category: Category) -> Task {
    Task {
        description: format!("{start} - {end}"),
        frequency: "once".to_string(),
        duration: Some(0),
        ..Task::new(title, category)
    }
}
