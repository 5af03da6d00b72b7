//! Executes one task: pick its accounts, clean them, write back the result.

use super::book::TaskBook;
use super::task::ScheduleTask;
use crate::engine::{CleanEngine, CleanReport};
use crate::logger::Logger;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// What one run of a task did; broadcast to scheduler subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub task_id: String,
    pub task_name: String,
    pub ran_at: DateTime<Utc>,
    pub report: CleanReport,
}

impl RunReport {
    #[must_use]
    pub fn summary(&self) -> String {
        self.report.summary()
    }
}

#[derive(Debug)]
pub struct TaskRunner {
    engine: Arc<CleanEngine>,
    base: PathBuf,
    book: Arc<TaskBook>,
    logger: Arc<Logger>,
}

impl TaskRunner {
    #[must_use]
    pub fn new(
        engine: Arc<CleanEngine>,
        base: impl Into<PathBuf>,
        book: Arc<TaskBook>,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            engine,
            base: base.into(),
            book,
            logger,
        }
    }

    /// Blocking. Per-account failures end up in the report, never as an error.
    pub fn run(&self, task: &ScheduleTask) -> RunReport {
        self.logger
            .info("SCHEDULE", &format!("Running task [{}]", task.name));

        let accounts = if task.accounts.is_empty() {
            self.engine.all_accounts(&self.base)
        } else {
            task.accounts.clone()
        };
        let report = self
            .engine
            .clean_accounts(&self.base, &accounts, &task.options);
        let ran_at = Utc::now();
        let summary = report.summary();

        if let Err(e) = self.book.record_run(&task.id, ran_at, summary.clone()) {
            self.logger
                .warn("SCHEDULE", &format!("Run result not stored: {e}"));
        }
        self.logger
            .info("SCHEDULE", &format!("Task [{}] done: {summary}", task.name));

        RunReport {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            ran_at,
            report,
        }
    }
}
