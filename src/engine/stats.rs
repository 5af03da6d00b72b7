//! Aggregated counts of a scan or clean, total and per category.

use super::format_size;
use crate::logger::Logger;
use crate::paths::Category;
use crate::walk::DirStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Same shape for inventories, estimates and actual deletions. Every
/// category is present, zeroed when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanStats {
    pub total_files: u64,
    pub total_size: u64,
    pub categories: BTreeMap<Category, DirStats>,
}

impl Default for CleanStats {
    fn default() -> Self {
        Self {
            total_files: 0,
            total_size: 0,
            categories: Category::ALL
                .into_iter()
                .map(|c| (c, DirStats::default()))
                .collect(),
        }
    }
}

impl CleanStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one directory's result to its category and to the totals.
    pub fn record(&mut self, category: Category, stats: DirStats) {
        *self.categories.entry(category).or_default() += stats;
        self.total_files += stats.files;
        self.total_size += stats.size;
    }

    #[must_use]
    pub fn category(&self, category: Category) -> DirStats {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_files == 0 && self.total_size == 0
    }

    /// A per-category table through `print`/`raw`, skipping empty rows.
    pub fn log(&self, logger: &Logger, scope: &str) {
        logger.print(
            scope,
            &format!(
                "{} files, {}",
                self.total_files,
                format_size(self.total_size)
            ),
        );
        for (category, stats) in &self.categories {
            if stats.is_empty() {
                continue;
            }
            logger.raw(&format!(
                "  {:<12} {:>8} files  {:>10}",
                category.as_str(),
                stats.files,
                format_size(stats.size)
            ));
        }
    }
}
