//! Log sinks. The host environment plugs its own logger in by implementing
//! [`Output`]; the built-in backends cover the CLI and the test suite.

mod file;
mod memory;
mod terminal;

pub use file::FileOutput;
pub use memory::MemoryOutput;
pub use terminal::TerminalOutput;

use crate::level::Level;

/// One log line as handed to every backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub scope: String,
    pub message: String,
    /// Continuation lines (table rows, per-account results) skip the tag and scope.
    pub raw: bool,
}

impl LogRecord {
    /// `[INFO ] SCOPE       message` without colors.
    #[must_use]
    pub fn plain(&self) -> String {
        if self.raw {
            self.message.clone()
        } else {
            format!("{} {:<10}  {}", self.level.tag(), self.scope, self.message)
        }
    }
}

/// `Send + Sync` so a single logger can be shared by scheduler timers and callers.
pub trait Output: Send + Sync {
    /// Renders one record.
    ///
    /// # Errors
    /// I/O errors from the underlying sink.
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error>;

    /// # Errors
    /// I/O errors from the underlying sink.
    fn flush(&self) -> Result<(), crate::Error>;
}
