use crate::model::{FreeSlot, ScheduledItem, Task, Unscheduled};

/// Fixed, ordered set of free slots consumed front to back.
///
/// The cursor never moves backwards: once a slot is exhausted no later task
/// can claim time before it.
#[derive(Debug)]
pub struct SlotArena {
    slots: Vec<FreeSlot>,
    cursor: usize,
}

impl SlotArena {
    pub fn new(slots: Vec<FreeSlot>) -> Self {
        Self { slots, cursor: 0 }
    }

    pub fn remaining_capacity(&self) -> u32 {
        self.slots[self.cursor..]
            .iter()
            .map(FreeSlot::capacity)
            .sum()
    }

    /// Claims up to `minutes` from the first slot with capacity left.
    fn claim(&mut self, minutes: u32) -> Option<(u32, u32)> {
        while let Some(slot) = self.slots.get_mut(self.cursor) {
            if slot.is_exhausted() {
                self.cursor += 1;
                continue;
            }

            let claimed = slot.take(minutes);
            if slot.is_exhausted() {
                self.cursor += 1;
            }
            return Some(claimed);
        }
        None
    }
}

#[derive(Debug, Default)]
pub struct PackOutcome {
    pub items: Vec<ScheduledItem>,
    pub unscheduled: Vec<Unscheduled>,
}

/// Places `tasks` in the given order, splitting a task over as many slots as
/// it needs. Whatever does not fit is reported in `unscheduled`.
pub fn pack(tasks: &[&Task], arena: &mut SlotArena) -> PackOutcome {
    let mut outcome = PackOutcome::default();

    for task in tasks {
        let mut remaining = task.planned_minutes();

        while remaining > 0 {
            let Some((start, end)) = arena.claim(remaining) else {
                break;
            };
            remaining -= end - start;
            outcome.items.push(ScheduledItem {
                id: task.id.clone(),
                title: task.title.clone(),
                category: task.category.clone(),
                start,
                end,
                done: Some(task.done),
                is_blocker: false,
            });
        }

        if remaining > 0 {
            tracing::debug!(title = %task.title, remaining, "task did not fit in horizon");
            outcome.unscheduled.push(Unscheduled {
                id: task.id.clone(),
                title: task.title.clone(),
                remaining,
            });
        }
    }

    outcome
}
