//! The operations a host front end calls: account inventories, ad hoc
//! cleans, default options and the scheduled task list.
//!
//! Results are plain serializable values; formatting them for a wire or a
//! terminal is the caller's business.

use crate::config::Config;
use crate::engine::{CleanEngine, CleanOptions, CleanReport, CleanStats, OptionsPatch};
use crate::logger::Logger;
use crate::schedule::{
    RunReport, ScheduleTask, Scheduler, TaskBook, TaskDraft, TaskPatch, TaskRunner,
};
use crate::store::{JsonFileStore, StoreDocument, TaskStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;

/// One entry of the account list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub uin: String,
    pub is_current: bool,
    pub stats: CleanStats,
}

/// Full inventory, plus what a clean keeping `retainDays` would remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub uin: String,
    pub stats: CleanStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated: Option<CleanStats>,
}

#[derive(Debug)]
pub struct CleanerService {
    engine: Arc<CleanEngine>,
    base: PathBuf,
    self_uin: Option<String>,
    book: Arc<TaskBook>,
    runner: Arc<TaskRunner>,
    scheduler: Scheduler,
    logger: Arc<Logger>,
}

impl CleanerService {
    /// Timers are spawned on `runtime`; nothing is armed until [`start`](Self::start).
    ///
    /// # Errors
    /// The task store could not be loaded.
    pub fn new(
        engine: Arc<CleanEngine>,
        base: impl Into<PathBuf>,
        store: Box<dyn TaskStore>,
        runtime: Handle,
        logger: Arc<Logger>,
    ) -> Result<Self, crate::Error> {
        let base = base.into();
        let book = Arc::new(TaskBook::open(store, Arc::clone(&logger))?);
        let runner = Arc::new(TaskRunner::new(
            Arc::clone(&engine),
            base.clone(),
            Arc::clone(&book),
            Arc::clone(&logger),
        ));
        let scheduler = Scheduler::new(
            runtime,
            Arc::clone(&book),
            Arc::clone(&runner),
            Arc::clone(&logger),
        );
        Ok(Self {
            engine,
            base,
            self_uin: None,
            book,
            runner,
            scheduler,
            logger,
        })
    }

    /// Layout, data directory, identities and store all taken from `config`.
    ///
    /// # Errors
    /// The task store could not be loaded.
    pub fn from_config(
        config: &Config,
        runtime: Handle,
        logger: Arc<Logger>,
    ) -> Result<Self, crate::Error> {
        let base = config.data_dir();
        let engine = Arc::new(CleanEngine::new(
            config.parse_platform(),
            Arc::clone(&logger),
        ));
        engine.load_identities(&base, &config.account_source());

        let store = Box::new(JsonFileStore::new(config.store_path()));
        let service = Self::new(engine, base, store, runtime, logger)?;
        Ok(match &config.host.self_uin {
            Some(uin) => service.with_self_uin(uin.clone()),
            None => service,
        })
    }

    /// The account the host runs as; the target of a clean with no accounts.
    #[must_use]
    pub fn with_self_uin(mut self, uin: impl Into<String>) -> Self {
        self.self_uin = Some(uin.into());
        self
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    #[must_use]
    pub const fn engine(&self) -> &Arc<CleanEngine> {
        &self.engine
    }

    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Arms every stored task.
    pub fn start(&self) {
        self.scheduler.start();
    }

    /// Cancels every timer.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }

    /// Every known account with its full inventory.
    #[must_use]
    pub fn list_accounts(&self) -> Vec<AccountSummary> {
        self.engine
            .all_accounts(&self.base)
            .into_iter()
            .map(|uin| {
                let stats = self
                    .engine
                    .scan_cache(&self.base, &uin, 0)
                    .unwrap_or_else(|e| {
                        self.logger
                            .warn("SERVICE", &format!("Scanning {uin} failed: {e}"));
                        CleanStats::new()
                    });
                AccountSummary {
                    is_current: self.self_uin.as_deref() == Some(uin.as_str()),
                    uin,
                    stats,
                }
            })
            .collect()
    }

    /// # Errors
    /// [`Error::InvalidAccount`](crate::Error::InvalidAccount) for a non-numeric uin.
    pub fn account_stats(&self, uin: &str, retain_days: u32) -> Result<AccountStats, crate::Error> {
        let stats = self.engine.scan_cache(&self.base, uin, 0)?;
        let estimated = if retain_days > 0 {
            Some(self.engine.scan_cache(&self.base, uin, retain_days)?)
        } else {
            None
        };
        Ok(AccountStats {
            uin: uin.to_string(),
            stats,
            estimated,
        })
    }

    /// Cleans now with the default options, overridden by `patch`.
    ///
    /// `None` targets the current account, an empty list every known account.
    ///
    /// # Errors
    /// [`Error::NoCurrentAccount`](crate::Error::NoCurrentAccount) when `accounts`
    /// is `None` and no current account is configured.
    pub fn clean(
        &self,
        accounts: Option<Vec<String>>,
        patch: Option<&OptionsPatch>,
    ) -> Result<CleanReport, crate::Error> {
        let targets = match accounts {
            None => vec![self.self_uin.clone().ok_or(crate::Error::NoCurrentAccount)?],
            Some(list) if list.is_empty() => self.engine.all_accounts(&self.base),
            Some(list) => list,
        };
        let defaults = self.book.default_options();
        let options = patch.map_or(defaults, |p| defaults.merged(p));

        self.logger.info(
            "SERVICE",
            &format!(
                "Cleaning {} accounts (retain {}d)",
                targets.len(),
                options.retain_days
            ),
        );
        let report = self.engine.clean_accounts(&self.base, &targets, &options);
        self.logger
            .info("SERVICE", &format!("Clean finished: {}", report.summary()));
        Ok(report)
    }

    /// Default options and every task, as persisted.
    #[must_use]
    pub fn config(&self) -> StoreDocument {
        self.book.snapshot()
    }

    #[must_use]
    pub fn default_options(&self) -> CleanOptions {
        self.book.default_options()
    }

    pub fn set_default_options(&self, patch: &OptionsPatch) -> CleanOptions {
        self.book.update_default_options(patch)
    }

    #[must_use]
    pub fn tasks(&self) -> Vec<ScheduleTask> {
        self.book.tasks()
    }

    /// # Errors
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) for an unknown id.
    pub fn task(&self, id: &str) -> Result<ScheduleTask, crate::Error> {
        self.book
            .get(id)
            .ok_or_else(|| crate::Error::TaskNotFound(id.to_string()))
    }

    /// Stores the task and arms it if enabled.
    pub fn create_task(&self, draft: TaskDraft) -> ScheduleTask {
        let task = self.book.insert(draft);
        self.scheduler.setup(&task);
        task
    }

    /// # Errors
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) for an unknown id.
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<ScheduleTask, crate::Error> {
        let task = self.book.update(id, patch)?;
        self.scheduler.setup(&task);
        Ok(task)
    }

    /// # Errors
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) for an unknown id.
    pub fn delete_task(&self, id: &str) -> Result<ScheduleTask, crate::Error> {
        self.scheduler.cancel(id);
        self.book.remove(id)
    }

    /// Runs a task on the calling thread, outside its schedule.
    ///
    /// # Errors
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) for an unknown id.
    pub fn run_task_now(&self, id: &str) -> Result<RunReport, crate::Error> {
        let task = self.task(id)?;
        Ok(self.runner.run(&task))
    }
}
