//! Severity levels for the cleaner's diagnostic output.

use std::fmt;
use std::str::FromStr;

/// Ordered so the logger can drop anything below its configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Per-file walk details.
    Trace = 0,
    /// Path resolution steps, skipped categories, timer bookkeeping.
    Debug = 1,
    /// Clean runs started and finished, tasks armed.
    #[default]
    Info = 2,
    /// A file or directory could not be read or removed.
    Warn = 3,
    /// An account's clean or a store flush failed.
    Error = 4,
}

impl Level {
    /// Lowercase, matching the strings accepted in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Fixed-width bracketed tag used by the terminal and file outputs.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Trace => "[TRACE]",
            Self::Debug => "[DEBUG]",
            Self::Info => "[INFO ]",
            Self::Warn => "[WARN ]",
            Self::Error => "[ERROR]",
        }
    }

    /// ANSI foreground sequence for the level's tag.
    #[must_use]
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Trace | Self::Debug => "\x1b[35m",
            Self::Info => "\x1b[36m",
            Self::Warn => "\x1b[33m",
            Self::Error => "\x1b[31m",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Trace,
            Self::Debug,
            Self::Info,
            Self::Warn,
            Self::Error,
        ]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` for unknown level names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "err" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
