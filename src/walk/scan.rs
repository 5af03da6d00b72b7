//! Read-only inventory: how many files (and bytes) are present, or would be
//! eligible for deletion under a cutoff.

use super::{DirStats, Visitor, is_expired, walk};
use crate::logger::Logger;
use std::fs::Metadata;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Counts every file when the cutoff is zero, otherwise only expired ones.
#[derive(Debug, Clone, Copy)]
pub struct ScanVisitor {
    now: SystemTime,
    cutoff: Duration,
}

impl ScanVisitor {
    #[must_use]
    pub const fn new(now: SystemTime, cutoff: Duration) -> Self {
        Self { now, cutoff }
    }
}

impl Visitor for ScanVisitor {
    fn visit_file(&mut self, _path: &Path, meta: &Metadata) -> Option<u64> {
        (self.cutoff.is_zero() || is_expired(meta, self.now, self.cutoff)).then(|| meta.len())
    }
}

/// Never touches the filesystem beyond reading it.
pub fn scan_dir(dir: &Path, cutoff: Duration, logger: &Logger) -> DirStats {
    let mut visitor = ScanVisitor::new(SystemTime::now(), cutoff);
    walk(dir, &mut visitor, logger)
}
