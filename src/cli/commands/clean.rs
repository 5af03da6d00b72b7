//! `ntclean clean`: an ad hoc clean with the default options as baseline.

use super::accounts::exit;
use crate::cli::util::emit_json;
use crate::engine::{OptionsPatch, format_size, parse_retain_days};
use crate::logger::Logger;
use crate::paths::Category;
use crate::service::CleanerService;
use std::process::ExitCode;

/// Flags override the stored defaults for this run only.
#[must_use]
pub fn cmd_clean(
    service: &CleanerService,
    logger: &Logger,
    accounts: Vec<String>,
    all_accounts: bool,
    retain_days: Option<&str>,
    skip: &[Category],
    json: bool,
) -> ExitCode {
    let mut patch = OptionsPatch::new();
    if let Some(days) = retain_days {
        patch = patch.retain_days(parse_retain_days(days));
    }
    for category in skip {
        logger.debug("CLI", &format!("Skipping {category}"));
        patch = patch.set(*category, false);
    }

    let targets = if all_accounts {
        Some(Vec::new())
    } else if accounts.is_empty() {
        None
    } else {
        Some(accounts)
    };

    let report = match service.clean(targets, Some(&patch)) {
        Ok(report) => report,
        Err(e) => {
            logger.error("CLEAN", &e.to_string());
            return ExitCode::FAILURE;
        }
    };
    if json {
        return exit(emit_json(logger, &report));
    }

    for outcome in &report.accounts {
        match (&outcome.stats, &outcome.error) {
            (Some(stats), _) => logger.print(
                "CLEAN",
                &format!(
                    "{}: {} files, {}",
                    outcome.uin,
                    stats.total_files,
                    format_size(stats.total_size)
                ),
            ),
            (None, Some(error)) => logger.warn("CLEAN", &format!("{}: {error}", outcome.uin)),
            (None, None) => {}
        }
    }
    logger.print("CLEAN", &report.summary());
    exit(report.failed().next().is_none())
}
