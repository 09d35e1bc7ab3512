use crate::error::AppError;
use crate::time_range::{format_minutes, parse_time};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "DAYPLAN_CONFIG_PATH";

pub const DEFAULT_WORK_START: &str = "08:00";
pub const DEFAULT_WORK_END: &str = "17:00";
pub const DEFAULT_BREAKFAST: &str = "09:00";
pub const DEFAULT_LUNCH: &str = "12:00";
pub const DEFAULT_DINNER: &str = "18:30";
pub const DEFAULT_DAYS: u32 = 7;
/// Longest horizon accepted for a planning pass.
pub const MAX_DAYS: u32 = 366;

/// Day frame and horizon used by a planning pass.
///
/// Clock values stay strings so they can be handed to a presentation layer
/// unchanged; they are converted with [`parse_time`] when planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub work_start: String,
    pub work_end: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub days: u32,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            work_start: DEFAULT_WORK_START.to_string(),
            work_end: DEFAULT_WORK_END.to_string(),
            breakfast: DEFAULT_BREAKFAST.to_string(),
            lunch: DEFAULT_LUNCH.to_string(),
            dinner: DEFAULT_DINNER.to_string(),
            days: DEFAULT_DAYS,
        }
    }
}

impl PlannerSettings {
    pub fn work_start_minutes(&self) -> u32 {
        parse_time(&self.work_start)
    }

    pub fn work_end_minutes(&self) -> u32 {
        parse_time(&self.work_end)
    }

    /// Replaces the work window with a recovered `[start, end)` range.
    pub fn with_work_window(mut self, start: u32, end: u32) -> Self {
        self.work_start = format_minutes(start);
        self.work_end = format_minutes(end);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub settings: PlannerSettings,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub work_start: Option<String>,
    pub work_end: Option<String>,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub days: Option<u32>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("dayplan")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("dayplan")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            settings: PlannerSettings::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            settings: PlannerSettings::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(settings) => ConfigLoad {
            settings,
            error: None,
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "using default planner settings");
            ConfigLoad {
                settings: PlannerSettings::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<PlannerSettings, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let settings: PlannerSettings = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    if !(1..=MAX_DAYS).contains(&settings.days) {
        return Err(AppError::invalid_data(format!(
            "days in {} must be between 1 and {MAX_DAYS}",
            path.display()
        )));
    }

    Ok(settings)
}

pub fn merge_overrides(base: &PlannerSettings, overrides: &ConfigOverrides) -> PlannerSettings {
    let mut merged = base.clone();
    let clocks = [
        (&mut merged.work_start, &overrides.work_start),
        (&mut merged.work_end, &overrides.work_end),
        (&mut merged.breakfast, &overrides.breakfast),
        (&mut merged.lunch, &overrides.lunch),
        (&mut merged.dinner, &overrides.dinner),
    ];
    for (target, value) in clocks {
        if let Some(value) = value {
            *target = value.clone();
        }
    }

    if let Some(days) = overrides.days {
        merged.days = days;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigOverrides, PlannerSettings, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides,
    };
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("dayplan-{nanos}-{file_name}"))
    }

    #[test]
    fn defaults_match_day_frame() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.work_start, "08:00");
        assert_eq!(settings.work_end, "17:00");
        assert_eq!(settings.breakfast, "09:00");
        assert_eq!(settings.lunch, "12:00");
        assert_eq!(settings.dinner, "18:30");
        assert_eq!(settings.days, 7);
        assert_eq!(settings.work_start_minutes(), 480);
        assert_eq!(settings.work_end_minutes(), 1020);
    }

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.settings, PlannerSettings::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.settings, PlannerSettings::default());
        assert_eq!(result.error.map(|err| err.code()), Some("invalid_data"));
    }

    #[test]
    fn load_config_fills_missing_fields_with_defaults() {
        let path = temp_path("partial-config.json");
        let content = serde_json::json!({
            "work_start": "07:30",
            "days": 3
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.work_start, "07:30");
        assert_eq!(loaded.work_end, "17:00");
        assert_eq!(loaded.days, 3);
    }

    #[test]
    fn load_config_rejects_out_of_range_days() {
        let path = temp_path("huge-days-config.json");
        let content = serde_json::json!({
            "work_start": "07:30",
            "days": 3_000_000
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.settings, PlannerSettings::default());
        let err = result.error.unwrap();
        assert_eq!(err.code(), "invalid_data");
        assert!(err.message().contains("between 1 and 366"));
    }

    #[test]
    fn merge_overrides_preserves_base_settings() {
        let base = PlannerSettings::default();
        let overrides = ConfigOverrides {
            work_end: Some("18:00".into()),
            lunch: Some("12:30".into()),
            days: Some(2),
            ..ConfigOverrides::default()
        };

        let merged = merge_overrides(&base, &overrides);

        assert_eq!(base.work_end, "17:00");
        assert_eq!(merged.work_start, "08:00");
        assert_eq!(merged.work_end, "18:00");
        assert_eq!(merged.lunch, "12:30");
        assert_eq!(merged.days, 2);
    }

    #[test]
    fn merge_overrides_with_empty_overrides_returns_clone() {
        let base = PlannerSettings {
            dinner: "19:00".into(),
            ..PlannerSettings::default()
        };

        let merged = merge_overrides(&base, &ConfigOverrides::default());

        assert_eq!(merged, base);
    }

    #[test]
    fn with_work_window_formats_clock_strings() {
        let settings = PlannerSettings::default().with_work_window(450, 990);
        assert_eq!(settings.work_start, "07:30");
        assert_eq!(settings.work_end, "16:30");
    }
}
