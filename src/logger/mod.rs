//! The leveled logger every core component receives. Built once through
//! [`LoggerBuilder`], shared as `Arc<Logger>`, and fanned out to all outputs.

mod builder;
mod from_config;

pub use builder::{FileBuilder, LoggerBuilder, TerminalBuilder};

use crate::level::Level;
use crate::output::{LogRecord, Output};

/// Immutable after build, so it can be shared across timer tasks without locks.
#[derive(Default)]
pub struct Logger {
    min_level: Level,
    outputs: Vec<Box<dyn Output>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// A logger with no outputs; every call is a no-op.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    /// Filters by severity, then fans out to all configured outputs.
    pub fn log(&self, level: Level, scope: &str, msg: &str) {
        if level < self.min_level {
            return;
        }
        self.dispatch(&LogRecord {
            level,
            scope: scope.to_string(),
            message: msg.to_string(),
            raw: false,
        });
    }

    pub fn trace(&self, scope: &str, msg: &str) {
        self.log(Level::Trace, scope, msg);
    }

    pub fn debug(&self, scope: &str, msg: &str) {
        self.log(Level::Debug, scope, msg);
    }

    pub fn info(&self, scope: &str, msg: &str) {
        self.log(Level::Info, scope, msg);
    }

    pub fn warn(&self, scope: &str, msg: &str) {
        self.log(Level::Warn, scope, msg);
    }

    pub fn error(&self, scope: &str, msg: &str) {
        self.log(Level::Error, scope, msg);
    }

    /// Command output (stats tables, clean results) is always shown,
    /// whatever the configured level.
    pub fn print(&self, scope: &str, msg: &str) {
        self.dispatch(&LogRecord {
            level: Level::Info,
            scope: scope.to_string(),
            message: msg.to_string(),
            raw: false,
        });
    }

    /// Continuation lines without tag or scope.
    pub fn raw(&self, msg: &str) {
        self.dispatch(&LogRecord {
            level: Level::Info,
            scope: String::new(),
            message: msg.to_string(),
            raw: true,
        });
    }

    fn dispatch(&self, record: &LogRecord) {
        for output in &self.outputs {
            let _ = output.write(record);
        }
    }

    /// # Errors
    /// Returns the first I/O error encountered across all outputs.
    pub fn flush(&self) -> Result<(), crate::Error> {
        for output in &self.outputs {
            output.flush()?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn min_level(&self) -> Level {
        self.min_level
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}
