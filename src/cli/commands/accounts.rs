//! `ntclean accounts` and `ntclean stats <uin>`.

use crate::cli::util::emit_json;
use crate::engine::{format_size, parse_retain_days};
use crate::logger::Logger;
use crate::service::CleanerService;
use std::process::ExitCode;

#[must_use]
pub fn cmd_accounts(service: &CleanerService, logger: &Logger, json: bool) -> ExitCode {
    let accounts = service.list_accounts();
    if json {
        return exit(emit_json(logger, &accounts));
    }

    if accounts.is_empty() {
        logger.print(
            "ACCOUNTS",
            &format!("No accounts found under {}", service.base().display()),
        );
        return ExitCode::SUCCESS;
    }
    for account in &accounts {
        logger.print(
            "ACCOUNTS",
            &format!(
                "{}{}  {} files, {}",
                account.uin,
                if account.is_current { " (current)" } else { "" },
                account.stats.total_files,
                format_size(account.stats.total_size)
            ),
        );
    }
    ExitCode::SUCCESS
}

#[must_use]
pub fn cmd_stats(
    service: &CleanerService,
    logger: &Logger,
    uin: &str,
    retain_days: Option<&str>,
    json: bool,
) -> ExitCode {
    let retain_days = retain_days.map_or(0, parse_retain_days);
    let stats = match service.account_stats(uin, retain_days) {
        Ok(stats) => stats,
        Err(e) => {
            logger.error("STATS", &e.to_string());
            return ExitCode::FAILURE;
        }
    };
    if json {
        return exit(emit_json(logger, &stats));
    }

    stats.stats.log(logger, "STATS");
    if let Some(estimated) = &stats.estimated {
        logger.print(
            "STATS",
            &format!("Older than {retain_days} days (reclaimable):"),
        );
        estimated.log(logger, "STATS");
    }
    ExitCode::SUCCESS
}

pub(super) const fn exit(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
