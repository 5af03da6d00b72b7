//! Daily log files for long-running daemons, where terminal output is lost.

use super::{LogRecord, Output};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Appends to `<base_dir>/<app>_<YYYY-MM-DD>.log`.
#[derive(Debug, Clone)]
pub struct FileOutput {
    base_dir: PathBuf,
    app_name: String,
    timestamp_format: String,
}

impl Default for FileOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOutput {
    #[must_use]
    pub fn new() -> Self {
        let base_dir = directories::ProjectDirs::from("", "", "ntclean").map_or_else(
            || PathBuf::from("logs"),
            |dirs| {
                dirs.state_dir()
                    .unwrap_or_else(|| dirs.data_dir())
                    .join("logs")
            },
        );

        Self {
            base_dir,
            app_name: "ntclean".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }

    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// strftime pattern for the line prefix.
    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Today's file; rolls over at local midnight.
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        let day = Local::now().format("%Y-%m-%d");
        self.base_dir.join(format!("{}_{day}.log", self.app_name))
    }
}

impl Output for FileOutput {
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        let path = self.current_path();
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let timestamp = Local::now().format(&self.timestamp_format);
        let mut line = format!("{timestamp} {}", record.plain());
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        Ok(())
    }
}
