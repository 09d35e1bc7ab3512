use super::restore::WORKDAY_TITLE;
use crate::config::PlannerSettings;
use crate::model::{BlockerKind, Category, FreeSlot, ScheduledItem, Task, TimeBlock};
use crate::time_range::{MINUTES_PER_DAY, parse_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkWindow {
    pub start: u32,
    pub end: u32,
}

impl WorkWindow {
    fn on_day(self, day: u32) -> Self {
        let offset = day * MINUTES_PER_DAY;
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Turns every blocker task with a parseable range into a [`TimeBlock`].
pub fn collect_blocks(tasks: &[Task]) -> Vec<TimeBlock> {
    tasks
        .iter()
        .filter(|task| task.category.is_blocker())
        .filter_map(to_time_block)
        .collect()
}

fn to_time_block(task: &Task) -> Option<TimeBlock> {
    let Some(range) = parse_range(&task.description) else {
        tracing::warn!(
            title = %task.title,
            description = %task.description,
            "blocker without a time range skipped"
        );
        return None;
    };

    let kind = match task.category {
        Category::PersonalBlocker => BlockerKind::Personal,
        _ => BlockerKind::Fixed,
    };
    let title = if task.title.is_empty() {
        "Block".to_string()
    } else {
        task.title.clone()
    };

    Some(TimeBlock {
        id: task.id.clone(),
        title,
        kind,
        start: range.start,
        end: range.end,
    })
}

/// Splits the working-day block out of `blocks`. Without one the window
/// comes from the settings.
pub fn take_work_window(
    blocks: &mut Vec<TimeBlock>,
    settings: &PlannerSettings,
) -> WorkWindow {
    match blocks.iter().position(|block| block.title == WORKDAY_TITLE) {
        Some(index) => {
            let block = blocks.remove(index);
            WorkWindow {
                start: block.start,
                end: block.end,
            }
        }
        None => WorkWindow {
            start: settings.work_start_minutes(),
            end: settings.work_end_minutes(),
        },
    }
}

/// Clips the blocks to the work window, drops the ones left empty and orders
/// the rest by start.
pub fn visible_blocks(blocks: Vec<TimeBlock>, window: WorkWindow) -> Vec<TimeBlock> {
    let mut visible: Vec<TimeBlock> = blocks
        .into_iter()
        .map(|block| block.clipped(window.start, window.end))
        .filter(|block| !block.is_empty())
        .collect();
    visible.sort_by_key(|block| block.start);
    visible
}

/// Gaps between `blocks` inside `[day_start, day_end)`. `blocks` must be
/// sorted by start; overlapping blocks are merged by the sweep.
pub fn find_free_slots(blocks: &[TimeBlock], day_start: u32, day_end: u32) -> Vec<FreeSlot> {
    let mut slots = Vec::new();
    let mut cursor = day_start;

    for block in blocks {
        if block.start > cursor {
            slots.push(FreeSlot {
                start: cursor,
                end: block.start,
            });
        }
        cursor = cursor.max(block.end);
    }

    if cursor < day_end {
        slots.push(FreeSlot {
            start: cursor,
            end: day_end,
        });
    }

    slots
}

/// Free slots of every day in the horizon, concatenated in day order.
pub fn multi_day_slots(visible: &[TimeBlock], window: WorkWindow, days: u32) -> Vec<FreeSlot> {
    let mut slots = Vec::new();

    for day in 0..days {
        let frame = window.on_day(day);
        let day_blocks: Vec<TimeBlock> = visible
            .iter()
            .map(|block| block.shifted(day * MINUTES_PER_DAY))
            .filter(|block| block.overlaps(frame.start, frame.end))
            .collect();
        slots.extend(find_free_slots(&day_blocks, frame.start, frame.end));
    }

    slots
}

/// Repeats every visible block once per day as a blocker item.
pub fn blocker_items(visible: &[TimeBlock], days: u32) -> Vec<ScheduledItem> {
    let mut items = Vec::with_capacity(visible.len() * days as usize);

    for day in 0..days {
        for block in visible {
            let shifted = block.shifted(day * MINUTES_PER_DAY);
            items.push(ScheduledItem {
                id: shifted.id,
                title: shifted.title,
                category: shifted.kind.category(),
                start: shifted.start,
                end: shifted.end,
                done: None,
                is_blocker: true,
            });
        }
    }

    items
}
