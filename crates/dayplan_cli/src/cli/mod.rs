use clap::{Parser, Subcommand};
use dayplan_core::config::{ConfigOverrides, MAX_DAYS};
use dayplan_core::time_range::try_parse_time;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task
    ///
    /// Example: dayplan add "Write report" --duration 90 --deadline 2025-03-12
    /// Example: dayplan add "Call bank" --category urgent
    Add {
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// todo, urgent, admin, homework, blocker or personal
        #[arg(long, default_value = "todo")]
        category: String,
        /// Due date (YYYY-MM-DD or RFC3339)
        #[arg(long)]
        deadline: Option<String>,
        /// Minutes to plan (defaults to 60)
        #[arg(long, allow_negative_numbers = true)]
        duration: Option<i64>,
        #[arg(long, default_value_t = 0)]
        priority: i64,
        #[arg(long, default_value = "")]
        frequency: String,
    },
    /// Edit fields of a task
    ///
    /// Example: dayplan edit task-1 --duration 45
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        duration: Option<i64>,
        #[arg(long)]
        priority: Option<i64>,
        #[arg(long)]
        frequency: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: dayplan delete task-1
    Delete {
        id: String,
    },
    /// Mark a task as done
    ///
    /// Example: dayplan done task-1
    Done {
        id: String,
    },
    /// List all stored tasks
    ///
    /// Example: dayplan list
    List,
    /// Create or move a daily blocker
    ///
    /// Example: dayplan block Arbeitstag 08:00 17:00
    /// Example: dayplan block Gym 18:00 19:00 --personal
    Block {
        title: String,
        start: String,
        end: String,
        #[arg(long)]
        personal: bool,
    },
    /// Plan the upcoming days
    ///
    /// Example: dayplan plan
    /// Example: dayplan plan --days 3 --day 1
    Plan {
        /// Number of days to plan
        #[arg(long, value_parser = parse_days)]
        days: Option<u32>,
        /// Only show the given zero-based day
        #[arg(long)]
        day: Option<u32>,
    },
    /// Show the effective day frame
    ///
    /// Example: dayplan settings
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    WorkStart,
    WorkEnd,
    Breakfast,
    Lunch,
    Dinner,
    Days,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "work_start" => ConfigOverrideTarget::WorkStart,
        "work_end" => ConfigOverrideTarget::WorkEnd,
        "breakfast" => ConfigOverrideTarget::Breakfast,
        "lunch" => ConfigOverrideTarget::Lunch,
        "dinner" => ConfigOverrideTarget::Dinner,
        "days" => ConfigOverrideTarget::Days,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if target == ConfigOverrideTarget::Days {
        parse_days(&value)?;
    } else if try_parse_time(&value).is_none() {
        return Err(format!("{canonical_field} must be a HH:MM time"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` value into a single override set; later
/// values win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        let value = parsed.value;
        match parsed.target {
            ConfigOverrideTarget::WorkStart => overrides.work_start = Some(value),
            ConfigOverrideTarget::WorkEnd => overrides.work_end = Some(value),
            ConfigOverrideTarget::Breakfast => overrides.breakfast = Some(value),
            ConfigOverrideTarget::Lunch => overrides.lunch = Some(value),
            ConfigOverrideTarget::Dinner => overrides.dinner = Some(value),
            ConfigOverrideTarget::Days => overrides.days = Some(parse_days(&value)?),
        }
    }

    Ok(overrides)
}

pub fn parse_days(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(days) if (1..=MAX_DAYS).contains(&days) => Ok(days),
        _ => Err(format!("days must be a whole number between 1 and {MAX_DAYS}")),
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
