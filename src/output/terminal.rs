//! Terminal output for the CLI: colored level tags, warnings and errors on stderr.

use super::{LogRecord, Output};
use crate::level::Level;
use std::io::{self, Write};

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone)]
pub struct TerminalOutput {
    /// Piped output and CI environments can't render ANSI escape codes.
    colors_enabled: bool,
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalOutput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            colors_enabled: true,
        }
    }

    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    fn format_record(&self, record: &LogRecord) -> String {
        if !self.colors_enabled {
            return record.plain();
        }
        format!(
            "{}{}{RESET} {DIM}{:<10}{RESET}  {}",
            record.level.ansi(),
            record.level.tag(),
            record.scope,
            record.message
        )
    }
}

impl Output for TerminalOutput {
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        if record.raw {
            writeln!(io::stdout(), "{}", record.message)?;
            return Ok(());
        }

        let formatted = self.format_record(record);
        if record.level >= Level::Warn {
            writeln!(io::stderr(), "{formatted}")?;
        } else {
            writeln!(io::stdout(), "{formatted}")?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }
}
