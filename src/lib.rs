//! `ntclean` - Retention-based cache cleaning for multi-account QQ NT data
//! directories.
//!
//! The crate locates each account's cache directories (per platform layout),
//! measures them by category, deletes files older than a retention window,
//! and runs those cleans on daily, weekly or interval schedules.
//!
//! # Example
//!
//! ```no_run
//! use ntclean::{CleanEngine, CleanOptions, Logger, Platform};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(Logger::builder().terminal().done().build());
//! let engine = CleanEngine::new(Platform::Windows, logger);
//! let base = Path::new("C:/Users/me/Documents/Tencent Files");
//!
//! for uin in engine.all_accounts(base) {
//!     let stale = engine.scan_cache(base, &uin, 7)?;
//!     println!("{uin}: {} files reclaimable", stale.total_files);
//!     engine.execute_clean(base, &uin, &CleanOptions::default())?;
//! }
//! # Ok::<(), ntclean::Error>(())
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `ntclean` command-line front end

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod level;
pub mod logger;
pub mod output;
pub mod paths;
pub mod platform;
pub mod schedule;
pub mod service;
pub mod store;
pub mod walk;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::Config;
pub use engine::{
    AccountOutcome, CleanEngine, CleanOptions, CleanReport, CleanStats, OptionsPatch,
    format_size, parse_retain_days,
};
pub use error::Error;
pub use identity::{AccountIdentity, AccountSource, IdentityCache, StaticAccounts};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use output::{FileOutput, MemoryOutput, Output, TerminalOutput};
pub use paths::{Category, CleanablePaths, PathResolver};
pub use platform::{DataRootStrategy, Platform};
pub use schedule::{
    Frequency, RunReport, ScheduleTask, Scheduler, TaskBook, TaskDraft, TaskPatch, TaskPhase,
    next_run,
};
pub use service::{AccountStats, AccountSummary, CleanerService};
pub use store::{JsonFileStore, MemoryStore, StoreDocument, TaskStore};
pub use walk::DirStats;
