//! The authoritative in-memory task list and default options.

use super::task::{ScheduleTask, TaskDraft, TaskPatch, generate_id};
use crate::engine::{CleanOptions, OptionsPatch};
use crate::logger::Logger;
use crate::store::{StoreDocument, TaskStore};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Every mutation is flushed to the store right away. A failed flush is
/// logged and the in-memory change is kept.
pub struct TaskBook {
    document: Mutex<StoreDocument>,
    store: Box<dyn TaskStore>,
    logger: Arc<Logger>,
}

impl TaskBook {
    /// Loads the document from `store`. A document that does not parse is
    /// replaced by the defaults with a warning.
    ///
    /// # Errors
    /// The store could not be read at all.
    pub fn open(store: Box<dyn TaskStore>, logger: Arc<Logger>) -> Result<Self, crate::Error> {
        let mut document = match store.load() {
            Ok(document) => document,
            Err(crate::Error::Json(e)) => {
                logger.warn(
                    "STORE",
                    &format!("Stored tasks are malformed, starting from defaults: {e}"),
                );
                StoreDocument::default()
            }
            Err(e) => return Err(e),
        };
        for task in &mut document.schedule_tasks {
            task.normalize();
        }
        logger.debug(
            "STORE",
            &format!("Loaded {} tasks", document.schedule_tasks.len()),
        );
        Ok(Self {
            document: Mutex::new(document),
            store,
            logger,
        })
    }

    fn lock(&self) -> MutexGuard<'_, StoreDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, document: &StoreDocument) {
        if let Err(e) = self.store.save(document) {
            self.logger
                .error("STORE", &format!("Failed to save tasks: {e}"));
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreDocument {
        self.lock().clone()
    }

    #[must_use]
    pub fn tasks(&self) -> Vec<ScheduleTask> {
        self.lock().schedule_tasks.clone()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<ScheduleTask> {
        self.lock()
            .schedule_tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    #[must_use]
    pub fn default_options(&self) -> CleanOptions {
        self.lock().default_options
    }

    /// Merges `patch` into the default options and returns the result.
    pub fn update_default_options(&self, patch: &OptionsPatch) -> CleanOptions {
        let mut document = self.lock();
        document.default_options = document.default_options.merged(patch);
        let options = document.default_options;
        self.flush(&document);
        options
    }

    /// Adds a task built from `draft` under a fresh id.
    pub fn insert(&self, draft: TaskDraft) -> ScheduleTask {
        let mut document = self.lock();
        let mut id = generate_id();
        while document.schedule_tasks.iter().any(|t| t.id == id) {
            id = generate_id();
        }
        let task = draft.into_task(id, &document.default_options);
        document.schedule_tasks.push(task.clone());
        self.flush(&document);
        self.logger
            .info("STORE", &format!("Created task [{}] {}", task.name, task.id));
        task
    }

    /// # Errors
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) for an unknown id.
    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<ScheduleTask, crate::Error> {
        self.modify(id, |task| patch.apply(task))
    }

    /// # Errors
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) for an unknown id.
    pub fn remove(&self, id: &str) -> Result<ScheduleTask, crate::Error> {
        let mut document = self.lock();
        let index = document
            .schedule_tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| crate::Error::TaskNotFound(id.to_string()))?;
        let task = document.schedule_tasks.remove(index);
        self.flush(&document);
        self.logger
            .info("STORE", &format!("Deleted task [{}] {}", task.name, task.id));
        Ok(task)
    }

    /// Stores the outcome of a run on the task.
    ///
    /// # Errors
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) if the task was
    /// deleted while it ran.
    pub fn record_run(
        &self,
        id: &str,
        at: DateTime<Utc>,
        summary: String,
    ) -> Result<ScheduleTask, crate::Error> {
        self.modify(id, |task| {
            task.last_run = Some(at);
            task.last_result = Some(summary);
        })
    }

    fn modify(
        &self,
        id: &str,
        f: impl FnOnce(&mut ScheduleTask),
    ) -> Result<ScheduleTask, crate::Error> {
        let mut document = self.lock();
        let task = document
            .schedule_tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| crate::Error::TaskNotFound(id.to_string()))?;
        f(task);
        let task = task.clone();
        self.flush(&document);
        Ok(task)
    }
}

impl std::fmt::Debug for TaskBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskBook")
            .field("tasks", &self.lock().schedule_tasks.len())
            .finish_non_exhaustive()
    }
}
