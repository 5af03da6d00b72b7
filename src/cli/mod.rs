//! Command-line front end for the cleaner service.

pub mod commands;
pub mod util;

use crate::paths::Category;
use crate::schedule::Frequency;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Log level for CLI arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for crate::level::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::Trace,
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
        }
    }
}

/// ntclean - Retention-based cache cleaner for QQ NT accounts.
#[derive(Parser)]
#[command(
    name = "ntclean",
    version,
    about = "Retention-based cache cleaner for QQ NT accounts"
)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Override the configured log level
    #[arg(long, global = true, value_enum)]
    pub level: Option<LogLevel>,
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List accounts with their cache inventory.
    Accounts,
    /// Show one account's cache, optionally with a reclaimable estimate.
    Stats {
        /// Account uin
        uin: String,
        /// Estimate what a clean keeping N days would free
        #[arg(long, value_name = "DAYS")]
        retain_days: Option<String>,
    },
    /// Delete cached files older than the retention window.
    Clean {
        /// Account to clean (repeatable; defaults to the current account)
        #[arg(long = "account", value_name = "UIN")]
        accounts: Vec<String>,
        /// Clean every known account
        #[arg(long, conflicts_with = "accounts")]
        all_accounts: bool,
        /// Keep files newer than N days (e.g. "7" or "7d")
        #[arg(long, value_name = "DAYS")]
        retain_days: Option<String>,
        /// Leave a category alone (repeatable)
        #[arg(long, value_name = "CATEGORY")]
        skip: Vec<Category>,
    },
    /// Show or change the default clean options.
    Options {
        #[command(subcommand)]
        action: Option<OptionsAction>,
    },
    /// Manage scheduled cleans.
    Tasks {
        #[command(subcommand)]
        action: Option<TasksAction>,
    },
    /// Run scheduled tasks until interrupted.
    Daemon,
}

#[derive(Subcommand)]
pub enum OptionsAction {
    /// Print the default options.
    Show,
    /// Change the default options.
    Set {
        #[arg(long, value_name = "DAYS")]
        retain_days: Option<String>,
        /// Category to turn on (repeatable)
        #[arg(long, value_name = "CATEGORY")]
        enable: Vec<Category>,
        /// Category to turn off (repeatable)
        #[arg(long, value_name = "CATEGORY")]
        disable: Vec<Category>,
    },
}

#[derive(Subcommand)]
pub enum TasksAction {
    /// List scheduled tasks.
    List,
    /// Create a task.
    Add {
        #[command(flatten)]
        task: TaskArgs,
    },
    /// Change fields of a task.
    Update {
        id: String,
        #[command(flatten)]
        task: TaskArgs,
        /// Turn the task on
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
    },
    /// Delete a task and its timer.
    Remove { id: String },
    /// Run a task now, outside its schedule.
    Run { id: String },
}

#[derive(Args, Default)]
pub struct TaskArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Target account (repeatable; none means all accounts)
    #[arg(long = "account", value_name = "UIN")]
    pub accounts: Vec<String>,
    #[arg(long, value_name = "0-23")]
    pub hour: Option<u32>,
    #[arg(long, value_name = "0-59")]
    pub minute: Option<u32>,
    /// daily, weekly or interval
    #[arg(long)]
    pub frequency: Option<Frequency>,
    /// Weekday for weekly (Sunday = 0), day count for interval
    #[arg(long, value_name = "N")]
    pub every: Option<u32>,
    #[arg(long, value_name = "DAYS")]
    pub retain_days: Option<String>,
    /// Leave a category alone (repeatable)
    #[arg(long, value_name = "CATEGORY")]
    pub skip: Vec<Category>,
    /// Create or switch the task off
    #[arg(long)]
    pub disable: bool,
}

pub use commands::{cmd_accounts, cmd_clean, cmd_daemon, cmd_options, cmd_stats, cmd_tasks};
pub use util::{build_logger, emit_json};
