//! Tests for task persistence and the task book.

use chrono::{TimeZone, Utc};
use ntclean::engine::OptionsPatch;
use ntclean::schedule::{Frequency, TaskDraft, TaskPatch};
use ntclean::{
    Category, JsonFileStore, Level, Logger, MemoryOutput, MemoryStore, StoreDocument, TaskBook,
    TaskStore,
};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn book(store: &MemoryStore) -> TaskBook {
    TaskBook::open(Box::new(store.clone()), Arc::new(Logger::silent())).unwrap()
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tasks.json"));
    let document = store.load().unwrap();
    assert_eq!(document, StoreDocument::default());
    assert_eq!(document.default_options.retain_days, 7);
}

#[test]
fn save_creates_parents_and_uses_camel_case() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/state/tasks.json");
    let store = JsonFileStore::new(&path);

    let mut document = StoreDocument::default();
    document.schedule_tasks.push(
        TaskDraft {
            name: Some("nightly".into()),
            ..TaskDraft::default()
        }
        .into_task("01jx".into(), &document.default_options),
    );
    store.save(&document).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["defaultOptions"]["enableNapCatData"], false);
    assert_eq!(json["scheduleTasks"][0]["cronHour"], 3);
    assert_eq!(json["scheduleTasks"][0]["frequency"], "daily");
    assert!(json["scheduleTasks"][0].get("lastRun").is_none());

    assert_eq!(store.load().unwrap(), document);
}

#[test]
fn reads_documents_written_by_hand() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"{
  "defaultOptions": { "retainDays": "3", "enableLog": false },
  "scheduleTasks": [
    {
      "id": "m1abc",
      "name": "weekly pics",
      "accounts": ["10001"],
      "options": { "enablePic": true, "retainDays": 14 },
      "cronHour": 4,
      "cronMinute": "30",
      "frequency": "weekly",
      "frequencyValue": 1,
      "enabled": true,
      "lastRun": "2025-05-01T04:30:00.000Z",
      "lastResult": "deleted 1 files, freed 1 KB"
    }
  ]
}"#,
    )
    .unwrap();

    let document = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(document.default_options.retain_days, 3);
    assert!(!document.default_options.enable_log);
    assert!(document.default_options.enable_video);

    let task = &document.schedule_tasks[0];
    assert_eq!(task.cron_minute, 30);
    assert_eq!(task.frequency, Frequency::Weekly);
    assert_eq!(task.options.retain_days, 14);
    assert_eq!(
        task.last_run,
        Some(Utc.with_ymd_and_hms(2025, 5, 1, 4, 30, 0).unwrap())
    );
}

#[test]
fn every_mutation_is_flushed() {
    let store = MemoryStore::new();
    let book = book(&store);

    let task = book.insert(TaskDraft::default());
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.document().schedule_tasks, vec![task.clone()]);

    book.update(
        &task.id,
        TaskPatch {
            enabled: Some(false),
            ..TaskPatch::default()
        },
    )
    .unwrap();
    book.update_default_options(&OptionsPatch::new().set(Category::Log, false));
    book.remove(&task.id).unwrap();

    assert_eq!(store.save_count(), 4);
    let saved = store.document();
    assert!(saved.schedule_tasks.is_empty());
    assert!(!saved.default_options.enable_log);
}

#[test]
fn new_tasks_take_current_defaults() {
    let store = MemoryStore::new();
    let book = book(&store);
    book.update_default_options(&OptionsPatch::new().retain_days(30));

    let task = book.insert(TaskDraft::default());
    assert_eq!(task.options.retain_days, 30);
    assert_eq!(task.id.len(), 26);
    assert_ne!(book.insert(TaskDraft::default()).id, task.id);
}

#[test]
fn unknown_ids_are_not_found() {
    let store = MemoryStore::new();
    let book = book(&store);

    assert!(matches!(
        book.update("nope", TaskPatch::default()),
        Err(ntclean::Error::TaskNotFound(_))
    ));
    assert!(matches!(
        book.remove("nope"),
        Err(ntclean::Error::TaskNotFound(_))
    ));
    assert!(book.get("nope").is_none());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn record_run_stores_result() {
    let store = MemoryStore::new();
    let book = book(&store);
    let task = book.insert(TaskDraft::default());
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap();

    let updated = book
        .record_run(&task.id, at, "deleted 2 files, freed 10 B".into())
        .unwrap();
    assert_eq!(updated.last_run, Some(at));
    assert_eq!(
        book.get(&task.id).unwrap().last_result.as_deref(),
        Some("deleted 2 files, freed 10 B")
    );
}

#[test]
fn failed_flush_keeps_memory_and_logs() {
    struct ReadOnly;

    impl TaskStore for ReadOnly {
        fn load(&self) -> Result<StoreDocument, ntclean::Error> {
            Ok(StoreDocument::default())
        }

        fn save(&self, _: &StoreDocument) -> Result<(), ntclean::Error> {
            Err(ntclean::Error::Io(std::io::Error::other("read-only")))
        }
    }

    let memory = MemoryOutput::new();
    let logger = Arc::new(Logger::builder().output(memory.clone()).build());
    let book = TaskBook::open(Box::new(ReadOnly), logger).unwrap();

    let task = book.insert(TaskDraft::default());
    assert!(book.get(&task.id).is_some());
    assert_eq!(memory.messages(Level::Error).len(), 1);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "{ not json").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(matches!(store.load(), Err(ntclean::Error::Json(_))));
    assert!(!path.exists());
    assert_eq!(fs::read_to_string(store.corrupt_path()).unwrap(), "{ not json");
}

#[test]
fn malformed_file_opens_with_defaults_and_a_warning() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, r#"{ "scheduleTasks": [ { "id": 1"#).unwrap();
    let store = JsonFileStore::new(&path);

    let memory = MemoryOutput::new();
    let logger = Arc::new(Logger::builder().output(memory.clone()).build());
    let book = TaskBook::open(Box::new(store.clone()), logger).unwrap();

    assert_eq!(book.snapshot(), StoreDocument::default());
    let warned = memory.messages(Level::Warn);
    assert_eq!(warned.len(), 1);
    assert!(warned[0].contains("malformed"));

    // The first save writes a fresh file and leaves the bad copy alone.
    book.insert(TaskDraft::default());
    assert_eq!(store.load().unwrap().schedule_tasks.len(), 1);
    assert!(store.corrupt_path().exists());
}
