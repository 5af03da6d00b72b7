//! In-memory capture, for hosts that forward records to their own logger
//! and for tests that assert on what the engine reported.

use super::{LogRecord, Output};
use crate::level::Level;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloning shares the same buffer, so one handle can be boxed into the
/// logger while the caller keeps another for reading.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages logged at exactly `level`.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level && !r.raw)
            .map(|r| r.message)
            .collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Output for MemoryOutput {
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        Ok(())
    }
}
