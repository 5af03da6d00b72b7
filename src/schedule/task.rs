//! The persisted task record and the partial shapes used to create and edit it.

use crate::engine::{CleanOptions, OptionsPatch, lenient_opt_u32, lenient_u32};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

pub const DEFAULT_TASK_NAME: &str = "New task";
pub const DEFAULT_HOUR: u32 = 3;
/// Used when an interval task has no (or a zero) day count.
pub const DEFAULT_INTERVAL_DAYS: u32 = 3;

/// How `frequencyValue` is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    /// `frequencyValue` is a weekday, Sunday = 0.
    Weekly,
    /// `frequencyValue` is a day count.
    Interval,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Interval => "interval",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError(pub String);

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown frequency: {} (daily, weekly, interval)", self.0)
    }
}

impl std::error::Error for ParseFrequencyError {}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "interval" | "every" => Ok(Self::Interval),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

/// Unknown or missing values read as daily.
impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

/// The typed form of `frequency` + `frequencyValue`, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Daily,
    Weekly { days_from_sunday: u32 },
    Interval { days: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTask {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Empty means every account known when the task runs.
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub options: CleanOptions,
    #[serde(default = "default_hour", deserialize_with = "lenient_hour")]
    pub cron_hour: u32,
    #[serde(default, deserialize_with = "lenient_minute")]
    pub cron_minute: u32,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub frequency_value: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<String>,
}

impl ScheduleTask {
    #[must_use]
    pub fn recurrence(&self) -> Recurrence {
        match self.frequency {
            Frequency::Daily => Recurrence::Daily,
            Frequency::Weekly => Recurrence::Weekly {
                days_from_sunday: self.frequency_value.min(6),
            },
            Frequency::Interval => Recurrence::Interval {
                days: if self.frequency_value == 0 {
                    DEFAULT_INTERVAL_DAYS
                } else {
                    self.frequency_value
                },
            },
        }
    }

    /// `cronHour:cronMinute:00`.
    #[must_use]
    pub fn trigger_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(clamp_hour(self.cron_hour), clamp_minute(self.cron_minute), 0)
            .unwrap_or_default()
    }

    /// Brings hand-edited values back into range.
    pub fn normalize(&mut self) {
        self.cron_hour = clamp_hour(self.cron_hour);
        self.cron_minute = clamp_minute(self.cron_minute);
        if self.frequency == Frequency::Weekly {
            self.frequency_value = self.frequency_value.min(6);
        }
    }
}

/// A lowercase ULID: time-ordered with a random suffix.
#[must_use]
pub fn generate_id() -> String {
    Ulid::new().to_string().to_lowercase()
}

/// Fields for a new task. Anything left out takes the creation default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    pub name: Option<String>,
    pub accounts: Option<Vec<String>>,
    /// Merged over the default options.
    pub options: Option<OptionsPatch>,
    /// Overrides `options.retainDays` when present.
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub retain_days: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub cron_hour: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub cron_minute: Option<u32>,
    pub frequency: Option<Frequency>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub frequency_value: Option<u32>,
    pub enabled: Option<bool>,
}

impl TaskDraft {
    #[must_use]
    pub fn into_task(self, id: String, defaults: &CleanOptions) -> ScheduleTask {
        let mut options = self
            .options
            .map_or(*defaults, |patch| defaults.merged(&patch));
        if let Some(days) = self.retain_days {
            options.retain_days = days;
        }

        let mut task = ScheduleTask {
            id,
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TASK_NAME.to_string()),
            accounts: self.accounts.unwrap_or_default(),
            options,
            cron_hour: self.cron_hour.unwrap_or(DEFAULT_HOUR),
            cron_minute: self.cron_minute.unwrap_or(0),
            frequency: self.frequency.unwrap_or_default(),
            frequency_value: self.frequency_value.unwrap_or(0),
            enabled: self.enabled.unwrap_or(true),
            last_run: None,
            last_result: None,
        };
        task.normalize();
        task
    }
}

/// A partial update. Present fields replace the task's; `options` is
/// replaced as a whole. The id and the run history cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub accounts: Option<Vec<String>>,
    pub options: Option<CleanOptions>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub cron_hour: Option<u32>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub cron_minute: Option<u32>,
    pub frequency: Option<Frequency>,
    #[serde(deserialize_with = "lenient_opt_u32")]
    pub frequency_value: Option<u32>,
    pub enabled: Option<bool>,
}

impl TaskPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, task: &mut ScheduleTask) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(accounts) = self.accounts {
            task.accounts = accounts;
        }
        if let Some(options) = self.options {
            task.options = options;
        }
        if let Some(hour) = self.cron_hour {
            task.cron_hour = hour;
        }
        if let Some(minute) = self.cron_minute {
            task.cron_minute = minute;
        }
        if let Some(frequency) = self.frequency {
            task.frequency = frequency;
        }
        if let Some(value) = self.frequency_value {
            task.frequency_value = value;
        }
        if let Some(enabled) = self.enabled {
            task.enabled = enabled;
        }
        task.normalize();
    }
}

const fn clamp_hour(hour: u32) -> u32 {
    if hour > 23 { 23 } else { hour }
}

const fn clamp_minute(minute: u32) -> u32 {
    if minute > 59 { 59 } else { minute }
}

const fn default_hour() -> u32 {
    DEFAULT_HOUR
}

const fn default_enabled() -> bool {
    true
}

fn lenient_hour<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_u32(deserializer).map(clamp_hour)
}

fn lenient_minute<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_u32(deserializer).map(clamp_minute)
}

/// A malformed timestamp reads as "never run" instead of failing the whole store.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Category;

    #[test]
    fn draft_defaults() {
        let task = TaskDraft::default().into_task("t1".into(), &CleanOptions::default());
        assert_eq!(task.name, DEFAULT_TASK_NAME);
        assert!(task.accounts.is_empty());
        assert_eq!((task.cron_hour, task.cron_minute), (3, 0));
        assert_eq!(task.frequency, Frequency::Daily);
        assert!(task.enabled);
        assert!(task.last_run.is_none());
    }

    #[test]
    fn draft_options_merge_over_defaults() {
        let draft = TaskDraft {
            options: Some(OptionsPatch::new().set(Category::Pic, false).retain_days(1)),
            retain_days: Some(14),
            ..TaskDraft::default()
        };
        let task = draft.into_task("t1".into(), &CleanOptions::default());
        assert!(!task.options.enable_pic);
        assert!(task.options.enable_video);
        assert_eq!(task.options.retain_days, 14);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let draft: TaskDraft = serde_json::from_str(
            r#"{"cronHour": "30", "cronMinute": 75, "frequency": "weekly", "frequencyValue": 9}"#,
        )
        .unwrap();
        let task = draft.into_task("t1".into(), &CleanOptions::default());
        assert_eq!((task.cron_hour, task.cron_minute), (23, 59));
        assert_eq!(task.frequency_value, 6);
    }

    #[test]
    fn interval_zero_means_three_days() {
        let mut task = TaskDraft::default().into_task("t1".into(), &CleanOptions::default());
        task.frequency = Frequency::Interval;
        assert_eq!(task.recurrence(), Recurrence::Interval { days: 3 });
    }

    #[test]
    fn patch_keeps_id_and_history() {
        let mut task = TaskDraft::default().into_task("t1".into(), &CleanOptions::default());
        task.last_result = Some("deleted 0 files, freed 0 B".into());
        let patch: TaskPatch =
            serde_json::from_str(r#"{"id": "other", "enabled": false, "name": "nightly"}"#)
                .unwrap();
        patch.apply(&mut task);
        assert_eq!(task.id, "t1");
        assert_eq!(task.name, "nightly");
        assert!(!task.enabled);
        assert!(task.last_result.is_some());
    }

    #[test]
    fn stored_task_with_sparse_fields() {
        let task: ScheduleTask = serde_json::from_str(
            r#"{"id": "abc", "frequency": "fortnightly", "lastRun": "not a date"}"#,
        )
        .unwrap();
        assert_eq!(task.frequency, Frequency::Daily);
        assert_eq!(task.cron_hour, 3);
        assert!(task.enabled);
        assert!(task.last_run.is_none());
    }

    #[test]
    fn ids_are_lowercase_and_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_eq!(a.len(), 26);
        assert_eq!(a, a.to_lowercase());
        assert_ne!(a, b);
    }
}
