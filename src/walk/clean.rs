//! Deleting walk: removes files older than the retention cutoff and prunes
//! the subdirectories that end up empty.

use super::{DirStats, Visitor, is_expired, retention, walk};
use crate::logger::Logger;
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::{Duration, SystemTime};

pub struct CleanVisitor<'a> {
    now: SystemTime,
    cutoff: Duration,
    logger: &'a Logger,
}

impl<'a> CleanVisitor<'a> {
    #[must_use]
    pub const fn new(now: SystemTime, cutoff: Duration, logger: &'a Logger) -> Self {
        Self {
            now,
            cutoff,
            logger,
        }
    }
}

impl Visitor for CleanVisitor<'_> {
    fn visit_file(&mut self, path: &Path, meta: &Metadata) -> Option<u64> {
        if !is_expired(meta, self.now, self.cutoff) {
            return None;
        }

        // Size is taken from the stat before the unlink.
        let size = meta.len();
        match fs::remove_file(path) {
            Ok(()) => {
                self.logger
                    .trace("CLEAN", &format!("Deleted {}", path.display()));
                Some(size)
            }
            Err(e) => {
                self.logger
                    .warn("CLEAN", &format!("Cannot delete {}: {e}", path.display()));
                None
            }
        }
    }

    fn leave_dir(&mut self, dir: &Path) {
        let is_empty = fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none());
        if is_empty && fs::remove_dir(dir).is_ok() {
            self.logger
                .trace("CLEAN", &format!("Removed empty dir {}", dir.display()));
        }
    }
}

/// Deletes files under `dir` older than `retain_days` days. The root itself
/// is kept even when it ends up empty.
pub fn clean_dir(dir: &Path, retain_days: u32, logger: &Logger) -> DirStats {
    let mut visitor = CleanVisitor::new(SystemTime::now(), retention(retain_days), logger);
    walk(dir, &mut visitor, logger)
}
