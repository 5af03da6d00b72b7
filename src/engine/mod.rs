//! The cleaning engine: resolves an account's cache directories, then scans
//! or cleans each category and aggregates the results.
//!
//! [`CleanEngine::execute_clean`] is the only operation that deletes
//! anything. Scans are read-only and repeatable.

mod options;
mod report;
mod size;
mod stats;

pub use options::{CleanOptions, OptionsPatch};
pub use report::{AccountOutcome, CleanReport};
pub use size::{format_size, parse_retain_days};
pub use stats::CleanStats;

pub(crate) use options::{lenient_opt_u32, lenient_u32};

use crate::identity::{AccountSource, IdentityCache};
use crate::logger::Logger;
use crate::paths::{CleanablePaths, PathResolver};
use crate::platform::{DataRootStrategy, Platform, is_valid_uin};
use crate::walk::{clean_dir, retention, scan_dir};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug)]
pub struct CleanEngine {
    resolver: PathResolver,
    logger: Arc<Logger>,
}

impl CleanEngine {
    #[must_use]
    pub fn new(platform: Platform, logger: Arc<Logger>) -> Self {
        Self::with_layout(platform.strategy(), logger)
    }

    #[must_use]
    pub fn with_layout(layout: Box<dyn DataRootStrategy>, logger: Arc<Logger>) -> Self {
        Self {
            resolver: PathResolver::new(layout, Arc::clone(&logger)),
            logger,
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.resolver.platform()
    }

    /// Seeds identity bindings from the host; see [`PathResolver::load_identities`].
    pub fn load_identities(&self, base: &Path, source: &dyn AccountSource) {
        self.resolver.load_identities(base, source);
    }

    #[must_use]
    pub fn identities(&self) -> IdentityCache {
        self.resolver.identities()
    }

    /// Forgets every uin/uid and hash-directory binding.
    pub fn reset_identities(&self) {
        self.resolver.with_identities(IdentityCache::clear);
    }

    /// # Errors
    /// [`Error::InvalidAccount`](crate::Error::InvalidAccount) if `uin` is not a digit string.
    pub fn cleanable_paths(&self, base: &Path, uin: &str) -> Result<CleanablePaths, crate::Error> {
        check_uin(uin)?;
        Ok(self.resolver.cleanable_paths(base, uin))
    }

    /// Counts files per category. With `retain_days == 0` this is the full
    /// inventory; otherwise only what a clean with that window would delete.
    ///
    /// # Errors
    /// [`Error::InvalidAccount`](crate::Error::InvalidAccount) if `uin` is not a digit string.
    pub fn scan_cache(
        &self,
        base: &Path,
        uin: &str,
        retain_days: u32,
    ) -> Result<CleanStats, crate::Error> {
        let paths = self.cleanable_paths(base, uin)?;
        let cutoff = retention(retain_days);
        let mut stats = CleanStats::new();

        for (category, dirs) in paths.iter() {
            for dir in dirs {
                stats.record(category, scan_dir(dir, cutoff, &self.logger));
            }
        }

        self.logger.debug(
            "SCAN",
            &format!(
                "Account {uin} (retain {retain_days}d): {} files, {}",
                stats.total_files,
                format_size(stats.total_size)
            ),
        );
        Ok(stats)
    }

    /// Deletes expired files in every enabled category. Disabled categories
    /// are not even walked.
    ///
    /// # Errors
    /// [`Error::InvalidAccount`](crate::Error::InvalidAccount) if `uin` is not a digit string.
    /// Individual file failures are logged, never returned.
    pub fn execute_clean(
        &self,
        base: &Path,
        uin: &str,
        options: &CleanOptions,
    ) -> Result<CleanStats, crate::Error> {
        let paths = self.cleanable_paths(base, uin)?;
        let mut stats = CleanStats::new();

        for (category, dirs) in paths.iter() {
            if !options.is_enabled(category) {
                if !dirs.is_empty() {
                    self.logger
                        .debug("CLEAN", &format!("Skipping disabled category {category}"));
                }
                continue;
            }
            for dir in dirs {
                stats.record(category, clean_dir(dir, options.retain_days, &self.logger));
            }
        }

        self.logger.info(
            "CLEAN",
            &format!(
                "Account {uin}: deleted {} files, freed {}",
                stats.total_files,
                format_size(stats.total_size)
            ),
        );
        Ok(stats)
    }

    /// Cleans each account in turn. A failure on one account is recorded in
    /// the report and never stops the others.
    #[must_use]
    pub fn clean_accounts(
        &self,
        base: &Path,
        accounts: &[String],
        options: &CleanOptions,
    ) -> CleanReport {
        let mut report = CleanReport::default();
        for uin in accounts {
            match self.execute_clean(base, uin, options) {
                Ok(stats) => report.push(AccountOutcome::cleaned(uin, stats)),
                Err(e) => {
                    self.logger
                        .error("CLEAN", &format!("Cleaning account {uin} failed: {e}"));
                    report.push(AccountOutcome::failed(uin, &e));
                }
            }
        }
        report
    }

    /// Accounts found under `base`. On the hashed layout only accounts with
    /// a known uid and an existing hash directory are listed.
    #[must_use]
    pub fn all_accounts(&self, base: &Path) -> Vec<String> {
        let accounts = self.resolver.accounts(base);
        self.logger.debug(
            "ACCOUNTS",
            &format!("{} accounts under {}", accounts.len(), base.display()),
        );
        accounts
    }
}

fn check_uin(uin: &str) -> Result<(), crate::Error> {
    if is_valid_uin(uin) {
        Ok(())
    } else {
        Err(crate::Error::InvalidAccount(uin.to_string()))
    }
}
