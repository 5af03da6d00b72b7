//! Persistence for the default options and the task list.
//!
//! The whole document is rewritten on every save; there is no partial-write
//! protection beyond that.

use crate::engine::CleanOptions;
use crate::schedule::ScheduleTask;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// `{ "defaultOptions": ..., "scheduleTasks": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreDocument {
    pub default_options: CleanOptions,
    pub schedule_tasks: Vec<ScheduleTask>,
}

pub trait TaskStore: Send + Sync {
    /// # Errors
    /// Unreadable or malformed storage.
    fn load(&self) -> Result<StoreDocument, crate::Error>;

    /// # Errors
    /// The document could not be written.
    fn save(&self, document: &StoreDocument) -> Result<(), crate::Error>;
}

/// Pretty-printed JSON on disk. A missing file loads as the default document;
/// a malformed one is moved to [`JsonFileStore::corrupt_path`] before the
/// parse error is returned, so the next save cannot overwrite it.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<path>.corrupt`
    #[must_use]
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Result<StoreDocument, crate::Error> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            // Best effort; the parse error is what gets reported.
            let _ = fs::rename(&self.path, self.corrupt_path());
            crate::Error::Json(e)
        })
    }

    fn save(&self, document: &StoreDocument) -> Result<(), crate::Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Keeps the last saved document in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    document: StoreDocument,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `document` already stored.
    #[must_use]
    pub fn with_document(document: StoreDocument) -> Self {
        Self {
            slot: Arc::new(Mutex::new(MemorySlot { document, saves: 0 })),
        }
    }

    #[must_use]
    pub fn document(&self) -> StoreDocument {
        self.lock().document.clone()
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<StoreDocument, crate::Error> {
        Ok(self.document())
    }

    fn save(&self, document: &StoreDocument) -> Result<(), crate::Error> {
        let mut slot = self.lock();
        slot.document = document.clone();
        slot.saves += 1;
        Ok(())
    }
}
