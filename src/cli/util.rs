//! Helpers shared by the subcommands.

use crate::config::Config;
use crate::level::Level;
use crate::logger::Logger;
use crate::schedule::{Recurrence, ScheduleTask};
use serde::Serialize;

/// The configured logger, with the level optionally overridden.
#[must_use]
pub fn build_logger(config: &Config, level: Option<Level>) -> Logger {
    Logger::from_config_at(config, level.unwrap_or_else(|| config.parse_level()))
}

/// Pretty JSON through the logger's raw channel.
pub fn emit_json<T: Serialize>(logger: &Logger, value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            logger.raw(&json);
            true
        }
        Err(e) => {
            logger.error("CLI", &format!("Failed to encode output: {e}"));
            false
        }
    }
}

/// One line per task for `tasks list`.
#[must_use]
pub fn describe_task(task: &ScheduleTask) -> String {
    let schedule = match task.recurrence() {
        Recurrence::Daily => "daily".to_string(),
        Recurrence::Weekly { days_from_sunday } => format!("weekly on day {days_from_sunday}"),
        Recurrence::Interval { days } => format!("every {days} days"),
    };
    let accounts = if task.accounts.is_empty() {
        "all accounts".to_string()
    } else {
        task.accounts.join(",")
    };
    format!(
        "{} [{}] {} at {:02}:{:02}, {}, retain {}d{}",
        task.id,
        task.name,
        schedule,
        task.cron_hour,
        task.cron_minute,
        accounts,
        task.options.retain_days,
        if task.enabled { "" } else { " (disabled)" }
    )
}
