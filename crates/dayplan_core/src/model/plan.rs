use super::task::Category;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerKind {
    Fixed,
    Personal,
}

impl BlockerKind {
    pub fn category(self) -> Category {
        match self {
            Self::Fixed => Category::FixedBlocker,
            Self::Personal => Category::PersonalBlocker,
        }
    }
}

/// A blocker recovered from a task, in minutes on the planning timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBlock {
    pub id: Option<String>,
    pub title: String,
    pub kind: BlockerKind,
    pub start: u32,
    pub end: u32,
}

impl TimeBlock {
    pub fn shifted(&self, offset: u32) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            ..self.clone()
        }
    }

    /// Clamps the block into `[window_start, window_end]`. The result may be
    /// empty or inverted; callers drop those.
    pub fn clipped(&self, window_start: u32, window_end: u32) -> Self {
        Self {
            start: self.start.max(window_start),
            end: self.end.min(window_end),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start < end && self.end > start
    }
}

/// Unclaimed time between blockers. `start` only moves forward while
/// flexible tasks are packed into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: u32,
    pub end: u32,
}

impl FreeSlot {
    pub fn capacity(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_exhausted(&self) -> bool {
        self.start >= self.end
    }

    /// Claims up to `minutes` from the front of the slot and returns the
    /// claimed `(start, end)` interval.
    pub fn take(&mut self, minutes: u32) -> (u32, u32) {
        let chunk = minutes.min(self.capacity());
        let start = self.start;
        self.start += chunk;
        (start, self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledItem {
    pub id: Option<String>,
    pub title: String,
    pub category: Category,
    pub start: u32,
    pub end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    pub is_blocker: bool,
}

impl ScheduledItem {
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

/// Minutes of a flexible task that did not fit into the planning horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unscheduled {
    pub id: Option<String>,
    pub title: String,
    pub remaining: u32,
}
