//! Results of cleaning several accounts in one go.

use super::{CleanStats, format_size};
use serde::Serialize;

/// One account's share of a batch clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOutcome {
    pub uin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CleanStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AccountOutcome {
    #[must_use]
    pub fn cleaned(uin: &str, stats: CleanStats) -> Self {
        Self {
            uin: uin.to_string(),
            stats: Some(stats),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(uin: &str, error: &crate::Error) -> Self {
        Self {
            uin: uin.to_string(),
            stats: None,
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub accounts: Vec<AccountOutcome>,
    pub total_files: u64,
    pub total_size: u64,
}

impl CleanReport {
    pub fn push(&mut self, outcome: AccountOutcome) {
        if let Some(stats) = &outcome.stats {
            self.total_files += stats.total_files;
            self.total_size += stats.total_size;
        }
        self.accounts.push(outcome);
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.accounts
            .iter()
            .filter(|o| o.is_failure())
            .map(|o| o.uin.as_str())
    }

    /// The text stored as a task's `lastResult`:
    /// `deleted 3 files, freed 1.5 KB (failed: 10001)`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!(
            "deleted {} files, freed {}",
            self.total_files,
            format_size(self.total_size)
        );
        let failed: Vec<&str> = self.failed().collect();
        if !failed.is_empty() {
            text.push_str(&format!(" (failed: {})", failed.join(", ")));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Category;
    use crate::walk::DirStats;

    #[test]
    fn summary_lists_failed_accounts() {
        let mut stats = CleanStats::new();
        stats.record(Category::Video, DirStats { files: 3, size: 1536 });

        let mut report = CleanReport::default();
        report.push(AccountOutcome::cleaned("10001", stats));
        report.push(AccountOutcome::failed(
            "x1",
            &crate::Error::InvalidAccount("x1".into()),
        ));

        assert_eq!(report.total_files, 3);
        assert_eq!(report.summary(), "deleted 3 files, freed 1.5 KB (failed: x1)");
    }

    #[test]
    fn empty_report() {
        assert_eq!(CleanReport::default().summary(), "deleted 0 files, freed 0 B");
    }
}
