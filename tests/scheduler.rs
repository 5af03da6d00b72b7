//! Scheduler tests on a paused tokio clock.

use ntclean::schedule::{TaskRunner, TaskPhase};
use ntclean::{
    CleanEngine, CleanOptions, Level, Logger, MemoryOutput, MemoryStore, Platform, ScheduleTask,
    Scheduler, TaskBook, TaskDraft, TaskPatch,
};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::{TempDir, tempdir};
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::TryRecvError;

const UIN: &str = "10001";

struct Fixture {
    base: TempDir,
    store: MemoryStore,
    book: Arc<TaskBook>,
    scheduler: Scheduler,
}

impl Fixture {
    fn new() -> Self {
        let base = tempdir().unwrap();
        let logger = Arc::new(Logger::silent());
        let engine = Arc::new(CleanEngine::new(Platform::Windows, Arc::clone(&logger)));
        let store = MemoryStore::new();
        let book = Arc::new(TaskBook::open(Box::new(store.clone()), Arc::clone(&logger)).unwrap());
        let runner = Arc::new(TaskRunner::new(
            engine,
            base.path(),
            Arc::clone(&book),
            Arc::clone(&logger),
        ));
        let scheduler = Scheduler::new(Handle::current(), Arc::clone(&book), runner, logger);
        Self {
            base,
            store,
            book,
            scheduler,
        }
    }

    /// A 30-day-old log file for the account.
    fn stale_file(&self) -> PathBuf {
        let path = self
            .base
            .path()
            .join(UIN)
            .join("nt_qq/nt_data/log/old.log");
        write_old(&path);
        path
    }

    fn task(&self, enabled: bool) -> ScheduleTask {
        self.book.insert(TaskDraft {
            accounts: Some(vec![UIN.to_string()]),
            enabled: Some(enabled),
            ..TaskDraft::default()
        })
    }
}

fn write_old(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"stale").unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(30 * 86_400))
        .unwrap();
}

fn is_armed(phase: TaskPhase) -> bool {
    matches!(phase, TaskPhase::Armed { .. })
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

const MORE_THAN_A_DAY: Duration = Duration::from_secs(25 * 3600);

#[tokio::test(start_paused = true)]
async fn fires_cleans_and_rearms() {
    let fx = Fixture::new();
    let stale = fx.stale_file();
    let mut reports = fx.scheduler.subscribe();

    let task = fx.task(true);
    fx.scheduler.setup(&task);
    assert!(is_armed(fx.scheduler.phase(&task.id)));

    tokio::time::advance(MORE_THAN_A_DAY).await;
    let report = reports.recv().await.unwrap();

    assert_eq!(report.task_id, task.id);
    assert_eq!(report.report.total_files, 1);
    assert_eq!(report.summary(), "deleted 1 files, freed 5 B");
    assert!(!stale.exists());

    let stored = fx.book.get(&task.id).unwrap();
    assert!(stored.last_run.is_some());
    assert_eq!(stored.last_result.as_deref(), Some("deleted 1 files, freed 5 B"));
    assert!(is_armed(fx.scheduler.phase(&task.id)));
    assert_eq!(fx.scheduler.active(), 1);
}

#[tokio::test(start_paused = true)]
async fn deleting_cancels_the_pending_timer() {
    let fx = Fixture::new();
    let stale = fx.stale_file();
    let mut reports = fx.scheduler.subscribe();

    let task = fx.task(true);
    fx.scheduler.setup(&task);
    fx.scheduler.cancel(&task.id);
    fx.book.remove(&task.id).unwrap();
    let saves = fx.store.save_count();

    tokio::time::advance(MORE_THAN_A_DAY * 2).await;
    settle().await;

    assert!(matches!(reports.try_recv(), Err(TryRecvError::Empty)));
    assert!(stale.exists());
    assert_eq!(fx.store.save_count(), saves);
    assert_eq!(fx.scheduler.phase(&task.id), TaskPhase::Idle);
    assert_eq!(fx.scheduler.active(), 0);
}

#[tokio::test(start_paused = true)]
async fn disabled_tasks_stay_idle() {
    let fx = Fixture::new();
    let task = fx.task(false);

    fx.scheduler.setup(&task);
    assert_eq!(fx.scheduler.phase(&task.id), TaskPhase::Idle);
    assert_eq!(fx.scheduler.active(), 0);
}

#[tokio::test(start_paused = true)]
async fn setup_twice_keeps_one_timer() {
    let fx = Fixture::new();
    let mut reports = fx.scheduler.subscribe();
    let task = fx.task(true);

    fx.scheduler.setup(&task);
    fx.scheduler.setup(&task);
    assert_eq!(fx.scheduler.active(), 1);

    tokio::time::advance(MORE_THAN_A_DAY).await;
    reports.recv().await.unwrap();
    settle().await;
    assert!(matches!(reports.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn disabled_while_armed_runs_once_then_idles() {
    let fx = Fixture::new();
    let mut reports = fx.scheduler.subscribe();
    let task = fx.task(true);
    fx.scheduler.setup(&task);

    // Edited in the book without re-arming.
    fx.book
        .update(
            &task.id,
            TaskPatch {
                enabled: Some(false),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    tokio::time::advance(MORE_THAN_A_DAY).await;
    reports.recv().await.unwrap();

    assert_eq!(fx.scheduler.phase(&task.id), TaskPhase::Idle);
    assert_eq!(fx.scheduler.active(), 0);
}

#[tokio::test(start_paused = true)]
async fn start_and_shutdown() {
    let fx = Fixture::new();
    let on = fx.task(true);
    let off = fx.task(false);
    let also_on = fx.task(true);

    fx.scheduler.start();
    assert!(is_armed(fx.scheduler.phase(&on.id)));
    assert!(is_armed(fx.scheduler.phase(&also_on.id)));
    assert_eq!(fx.scheduler.phase(&off.id), TaskPhase::Idle);

    fx.scheduler.shutdown();
    assert_eq!(fx.scheduler.active(), 0);
}

#[tokio::test(start_paused = true)]
async fn a_failing_account_does_not_stop_the_chain() {
    let fx = Fixture::new();
    let stale = fx.stale_file();
    let mut reports = fx.scheduler.subscribe();

    let task = fx.book.insert(TaskDraft {
        accounts: Some(vec!["bad/uin".to_string(), UIN.to_string()]),
        ..TaskDraft::default()
    });
    fx.scheduler.setup(&task);

    tokio::time::advance(MORE_THAN_A_DAY).await;
    let report = reports.recv().await.unwrap();

    assert_eq!(report.report.failed().collect::<Vec<_>>(), vec!["bad/uin"]);
    assert!(!stale.exists());
    assert!(is_armed(fx.scheduler.phase(&task.id)));
}

#[test]
fn run_of_a_removed_task_warns_that_the_result_was_dropped() {
    let base = tempdir().unwrap();
    let memory = MemoryOutput::new();
    let logger = Arc::new(Logger::builder().output(memory.clone()).build());
    let engine = Arc::new(CleanEngine::new(Platform::Windows, Arc::clone(&logger)));
    let store = MemoryStore::new();
    let book = Arc::new(TaskBook::open(Box::new(store.clone()), Arc::clone(&logger)).unwrap());
    let runner = TaskRunner::new(engine, base.path(), book, logger);

    let task = TaskDraft::default().into_task("removed".into(), &CleanOptions::default());
    let run = runner.run(&task);

    assert_eq!(run.task_id, "removed");
    assert!(store.document().schedule_tasks.is_empty());
    let warned = memory.messages(Level::Warn);
    assert_eq!(warned.len(), 1);
    assert!(warned[0].starts_with("Run result not stored"));
}
