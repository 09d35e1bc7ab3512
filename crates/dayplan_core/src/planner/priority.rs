use crate::model::{Category, Task};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Parses a deadline as either a calendar date (midnight UTC) or an RFC 3339
/// timestamp. Blank or unrecognized values are treated as no deadline.
pub fn parse_deadline(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight().assume_utc());
    }

    match OffsetDateTime::parse(trimmed, &Rfc3339) {
        Ok(moment) => Some(moment),
        Err(_) => {
            tracing::warn!(deadline = trimmed, "unparseable deadline ignored");
            None
        }
    }
}

/// Whole days elapsed since the deadline, floored. Positive means overdue.
pub fn days_past_deadline(deadline: Option<&str>, now: OffsetDateTime) -> Option<i64> {
    let deadline = parse_deadline(deadline?)?;
    let elapsed = (now - deadline).whole_nanoseconds();
    i64::try_from(elapsed.div_euclid(NANOS_PER_DAY)).ok()
}

/// Priority bucket for a flexible task; lower ranks are packed first.
pub fn rank(task: &Task, now: OffsetDateTime) -> u8 {
    let days = days_past_deadline(task.deadline.as_deref(), now);
    match task.category {
        Category::UrgentTodo => 0,
        Category::Todo => match days {
            Some(days) if days > 5 => 1,
            Some(days) if days >= -3 => 4,
            _ => 6,
        },
        Category::Homework => match days {
            Some(days) if days > 6 => 2,
            _ => 5,
        },
        Category::Admin => 3,
        _ => 7,
    }
}

/// Orders tasks by rank. Equal ranks keep their incoming order.
pub fn sort_for_calendar(tasks: &mut [&Task], now: OffsetDateTime) {
    tasks.sort_by_key(|task| rank(task, now));
}
