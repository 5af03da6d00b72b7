//! Stepwise construction of a [`Logger`], one sub-builder per built-in backend.

use super::Logger;
use crate::level::Level;
use crate::output::{FileOutput, Output, TerminalOutput};
use std::path::PathBuf;

#[derive(Default)]
pub struct LoggerBuilder {
    min_level: Level,
    outputs: Vec<Box<dyn Output>>,
}

impl LoggerBuilder {
    /// Info by default; Debug/Trace are opt-in.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: Level::Info,
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub const fn terminal(self) -> TerminalBuilder {
        TerminalBuilder {
            parent: self,
            output: TerminalOutput::new(),
        }
    }

    #[must_use]
    pub fn file(self) -> FileBuilder {
        FileBuilder {
            parent: self,
            output: FileOutput::new(),
        }
    }

    /// Any other sink, e.g. an adapter onto the host environment's logger.
    #[must_use]
    pub fn output(mut self, output: impl Output + 'static) -> Self {
        self.outputs.push(Box::new(output));
        self
    }

    #[must_use]
    pub fn build(self) -> Logger {
        Logger {
            min_level: self.min_level,
            outputs: self.outputs,
        }
    }
}

pub struct TerminalBuilder {
    parent: LoggerBuilder,
    output: TerminalOutput,
}

impl TerminalBuilder {
    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.output = self.output.colors(enabled);
        self
    }

    /// Returns to the parent builder with the terminal output attached.
    #[must_use]
    pub fn done(self) -> LoggerBuilder {
        self.parent.output(self.output)
    }
}

pub struct FileBuilder {
    parent: LoggerBuilder,
    output: FileOutput,
}

impl FileBuilder {
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output = self.output.base_dir(dir);
        self
    }

    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.output = self.output.app_name(name);
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.output = self.output.timestamp_format(format);
        self
    }

    /// Returns to the parent builder with the file output attached.
    #[must_use]
    pub fn done(self) -> LoggerBuilder {
        self.parent.output(self.output)
    }
}
