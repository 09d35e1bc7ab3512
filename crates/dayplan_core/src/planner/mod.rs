//! Day planning: fixed blockers are laid out per day, flexible tasks are
//! packed greedily into the gaps left between them.

mod packer;
pub mod priority;
pub mod restore;
pub mod slots;

pub use packer::{PackOutcome, SlotArena, pack};
pub use restore::{
    BREAKFAST_TITLE, DINNER_TITLE, LUNCH_TITLE, WORKDAY_TITLE, blocker_range, day_structure_task,
    restore_from_tasks,
};

use crate::config::{MAX_DAYS, PlannerSettings};
use crate::model::{ScheduledItem, Task, Unscheduled};
use crate::time_range::{MINUTES_PER_DAY, format_minutes};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    /// Clock string of the work window start, for laying out an hour grid.
    pub work_start: String,
    pub work_end: String,
    pub days: u32,
    /// Blockers and task chunks, ordered by start.
    pub items: Vec<ScheduledItem>,
    pub unscheduled: Vec<Unscheduled>,
}

impl DayPlan {
    /// Items starting on the zero-based `day` of the horizon.
    pub fn items_for_day(&self, day: u32) -> Vec<&ScheduledItem> {
        let Some(day_start) = day.checked_mul(MINUTES_PER_DAY) else {
            return Vec::new();
        };
        let day_end = day_start.saturating_add(MINUTES_PER_DAY);
        self.items
            .iter()
            .filter(|item| item.start >= day_start && item.start < day_end)
            .collect()
    }
}

/// Builds the plan for `settings.days` days starting at day zero.
///
/// `settings` should already carry the day frame recovered from stored
/// blockers (see [`restore_from_tasks`]). `now` is used to rank deadlines.
/// Horizons longer than [`MAX_DAYS`] are cut to `MAX_DAYS`.
pub fn build_plan(tasks: &[Task], settings: &PlannerSettings, now: OffsetDateTime) -> DayPlan {
    let days = settings.days.min(MAX_DAYS);
    if days < settings.days {
        tracing::warn!(requested = settings.days, days, "planning horizon capped");
    }

    let mut blocks = slots::collect_blocks(tasks);
    let window = slots::take_work_window(&mut blocks, settings);
    let visible = slots::visible_blocks(blocks, window);
    let free = slots::multi_day_slots(&visible, window, days);
    tracing::debug!(
        work_start = window.start,
        work_end = window.end,
        blockers = visible.len(),
        slots = free.len(),
        days,
        "computed free slots"
    );

    let mut flexible: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.category.is_blocker() && !task.done)
        .collect();
    priority::sort_for_calendar(&mut flexible, now);

    let mut arena = SlotArena::new(free);
    let packed = pack(&flexible, &mut arena);
    tracing::debug!(
        tasks = flexible.len(),
        chunks = packed.items.len(),
        unscheduled = packed.unscheduled.len(),
        idle_minutes = arena.remaining_capacity(),
        "packed flexible tasks"
    );

    let mut items = slots::blocker_items(&visible, days);
    items.extend(packed.items);
    items.sort_by_key(|item| item.start);

    DayPlan {
        work_start: format_minutes(window.start),
        work_end: format_minutes(window.end),
        days,
        items,
        unscheduled: packed.unscheduled,
    }
}
