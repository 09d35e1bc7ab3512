mod plan;
mod task;

pub use plan::{BlockerKind, FreeSlot, ScheduledItem, TimeBlock, Unscheduled};
pub use task::{Category, DEFAULT_DURATION_MINUTES, Task};
