//! Recursive directory walking shared by the read-only scanner and the
//! deleting cleaner. Both are a [`Visitor`] over the same depth-first walk,
//! so counting, age filtering and error handling live in one place.
//!
//! Nothing here returns an error: unreadable directories and files are
//! logged and contribute zero, and a missing root is an empty result.

mod clean;
mod scan;

pub use clean::{CleanVisitor, clean_dir};
pub use scan::{ScanVisitor, scan_dir};

use crate::logger::Logger;
use serde::Serialize;
use std::fs::{self, Metadata};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// One day, the unit of `retainDays`.
pub const DAY: Duration = Duration::from_secs(86_400);

/// File count and byte total for a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirStats {
    pub files: u64,
    pub size: u64,
}

impl DirStats {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files == 0 && self.size == 0
    }
}

impl AddAssign for DirStats {
    fn add_assign(&mut self, rhs: Self) {
        self.files += rhs.files;
        self.size += rhs.size;
    }
}

/// Per-file decision made during a walk.
pub trait Visitor {
    /// Returns the bytes to account for this regular file, or `None` to
    /// leave it out of the totals.
    fn visit_file(&mut self, path: &Path, meta: &Metadata) -> Option<u64>;

    /// Called after a subdirectory (never the root) has been fully walked.
    fn leave_dir(&mut self, _dir: &Path) {}
}

/// `retainDays` as a cutoff age.
#[must_use]
pub fn retention(retain_days: u32) -> Duration {
    Duration::from_secs(DAY.as_secs() * u64::from(retain_days))
}

/// Strictly older than `cutoff`. Files with a modification time in the
/// future (or none at all) are never considered expired.
#[must_use]
pub fn is_expired(meta: &Metadata, now: SystemTime, cutoff: Duration) -> bool {
    meta.modified()
        .ok()
        .and_then(|modified| now.duration_since(modified).ok())
        .is_some_and(|age| age > cutoff)
}

/// Depth-first walk of `dir`. Symlinks are neither followed nor counted.
pub fn walk<V: Visitor>(dir: &Path, visitor: &mut V, logger: &Logger) -> DirStats {
    let mut stats = DirStats::default();
    if !dir.is_dir() {
        return stats;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            logger.warn("WALK", &format!("Cannot read {}: {e}", dir.display()));
            return stats;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.warn("WALK", &format!("Cannot read entry in {}: {e}", dir.display()));
                continue;
            }
        };
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            stats += walk(&path, visitor, logger);
            visitor.leave_dir(&path);
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(meta) => {
                    if let Some(size) = visitor.visit_file(&path, &meta) {
                        stats.files += 1;
                        stats.size += size;
                    }
                }
                Err(e) => {
                    logger.warn("WALK", &format!("Cannot stat {}: {e}", path.display()));
                }
            }
        }
    }

    stats
}

/// Immediate subdirectories as `(name, path)`, sorted by name. A missing
/// directory is empty; an unreadable one is logged and empty.
#[must_use]
pub fn child_dirs(dir: &Path, logger: &Logger) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            logger.warn("WALK", &format!("Cannot read {}: {e}", dir.display()));
            return Vec::new();
        }
    };

    let mut dirs: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            Some((name, e.path()))
        })
        .collect();
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_is_whole_days() {
        assert_eq!(retention(0), Duration::ZERO);
        assert_eq!(retention(7), Duration::from_millis(7 * 86_400_000));
    }

    #[test]
    fn stats_accumulate() {
        let mut total = DirStats::default();
        total += DirStats { files: 2, size: 10 };
        total += DirStats { files: 1, size: 5 };
        assert_eq!(total, DirStats { files: 3, size: 15 });
        assert!(!total.is_empty());
    }
}
