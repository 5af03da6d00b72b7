//! Timed cleaning. Each task id owns at most one slot holding its phase and
//! its pending timer:
//!
//! ```text
//! Idle --setup--> Armed --timer--> Running --still enabled--> Armed
//!   ^               |                 |
//!   +----cancel-----+                 +------disabled/deleted--> Idle
//! ```
//!
//! Timers are tokio tasks on the handle given to [`Scheduler::new`]. A run
//! happens on the blocking pool, then the task is re-read from the
//! [`TaskBook`] before re-arming, so edits made meanwhile are honoured.

mod book;
mod recurrence;
mod runner;
mod task;

pub use book::TaskBook;
pub use recurrence::next_run;
pub use runner::{RunReport, TaskRunner};
pub use task::{
    DEFAULT_INTERVAL_DAYS, DEFAULT_TASK_NAME, Frequency, ParseFrequencyError, Recurrence,
    ScheduleTask, TaskDraft, TaskPatch, generate_id,
};

use crate::logger::Logger;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const REPORT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Idle,
    Armed { next_run: DateTime<Local> },
    Running,
}

struct Slot {
    generation: u64,
    phase: TaskPhase,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    runtime: Handle,
    book: Arc<TaskBook>,
    runner: Arc<TaskRunner>,
    slots: Mutex<HashMap<String, Slot>>,
    generation: AtomicU64,
    reports: broadcast::Sender<RunReport>,
    logger: Arc<Logger>,
}

/// Cheap to clone; clones drive the same timers.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    #[must_use]
    pub fn new(
        runtime: Handle,
        book: Arc<TaskBook>,
        runner: Arc<TaskRunner>,
        logger: Arc<Logger>,
    ) -> Self {
        let (reports, _) = broadcast::channel(REPORT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                runtime,
                book,
                runner,
                slots: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                reports,
                logger,
            }),
        }
    }

    /// Arms every stored task.
    pub fn start(&self) {
        let tasks = self.inner.book.tasks();
        self.inner
            .logger
            .info("SCHEDULE", &format!("Starting {} tasks", tasks.len()));
        for task in &tasks {
            self.setup(task);
        }
    }

    /// Replaces any timer for `task.id` with one for its next run. Disabled
    /// tasks are left idle.
    pub fn setup(&self, task: &ScheduleTask) {
        self.inner.arm(task);
    }

    /// Drops the pending timer for `id`. A run already in progress finishes
    /// but does not re-arm.
    pub fn cancel(&self, id: &str) {
        self.inner.cancel(id);
    }

    /// Cancels every timer.
    pub fn shutdown(&self) {
        let ids: Vec<String> = self.inner.slots().keys().cloned().collect();
        for id in &ids {
            self.inner.cancel(id);
        }
        self.inner.logger.debug("SCHEDULE", "All timers cleared");
    }

    #[must_use]
    pub fn phase(&self, id: &str) -> TaskPhase {
        self.inner
            .slots()
            .get(id)
            .map_or(TaskPhase::Idle, |slot| slot.phase)
    }

    /// Number of tasks that are armed or running.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.slots().len()
    }

    /// Receives a [`RunReport`] after every timed run.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RunReport> {
        self.inner.reports.subscribe()
    }

    #[must_use]
    pub fn book(&self) -> &Arc<TaskBook> {
        &self.inner.book
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("active", &self.active())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel(&self, id: &str) {
        if let Some(slot) = self.slots().remove(id)
            && let Some(timer) = slot.timer
        {
            timer.abort();
            self.logger
                .debug("SCHEDULE", &format!("Cancelled timer for {id}"));
        }
    }

    fn arm(self: &Arc<Self>, task: &ScheduleTask) {
        self.cancel(&task.id);
        if !task.enabled {
            self.logger
                .debug("SCHEDULE", &format!("Task [{}] is disabled", task.name));
            return;
        }

        let now = Local::now();
        let next = next_run(task, &now);
        let delay = (next - now).to_std().unwrap_or_default();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        self.logger.info(
            "SCHEDULE",
            &format!(
                "Task [{}] ({}) will run at {}",
                task.name,
                task.frequency,
                next.format("%Y-%m-%d %H:%M:%S")
            ),
        );

        let inner = Arc::clone(self);
        let id = task.id.clone();
        let mut slots = self.slots();
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            inner.fire(id, generation).await;
        });
        let replaced = slots.insert(
            task.id.clone(),
            Slot {
                generation,
                phase: TaskPhase::Armed { next_run: next },
                timer: Some(timer),
            },
        );
        if let Some(old) = replaced
            && let Some(timer) = old.timer
        {
            timer.abort();
        }
    }

    fn owns(&self, id: &str, generation: u64) -> bool {
        self.slots()
            .get(id)
            .is_some_and(|slot| slot.generation == generation)
    }

    async fn fire(self: Arc<Self>, id: String, generation: u64) {
        {
            let mut slots = self.slots();
            match slots.get_mut(&id) {
                Some(slot) if slot.generation == generation => {
                    slot.phase = TaskPhase::Running;
                    // Detach: a later cancel must not abort this run.
                    slot.timer = None;
                }
                _ => return,
            }
        }

        let Some(task) = self.book.get(&id) else {
            self.finish(&id, generation);
            return;
        };

        let runner = Arc::clone(&self.runner);
        match tokio::task::spawn_blocking(move || runner.run(&task)).await {
            Ok(report) => {
                let _ = self.reports.send(report);
            }
            Err(e) => {
                self.logger
                    .error("SCHEDULE", &format!("Run of task {id} failed: {e}"));
            }
        }

        if !self.owns(&id, generation) {
            return;
        }
        match self.book.get(&id) {
            Some(task) if task.enabled => self.arm(&task),
            _ => self.finish(&id, generation),
        }
    }

    fn finish(&self, id: &str, generation: u64) {
        let mut slots = self.slots();
        if slots.get(id).is_some_and(|slot| slot.generation == generation) {
            slots.remove(id);
        }
    }
}
