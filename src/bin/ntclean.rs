//! `ntclean` binary: loads the config, builds the service on a tokio
//! runtime, and dispatches the subcommand.
//!
//! Usage:
//!   ntclean accounts                         List accounts and their cache size
//!   ntclean stats <uin> [--retain-days N]    One account, with a reclaimable estimate
//!   ntclean clean [--account UIN]... [--all-accounts] [--retain-days N] [--skip CAT]...
//!   ntclean options [show|set]               Default clean options
//!   ntclean tasks [list|add|update|remove|run]
//!   ntclean daemon                           Run scheduled tasks until Ctrl-C

use clap::Parser;
use ntclean::cli::{
    Cli, Command, build_logger, cmd_accounts, cmd_clean, cmd_daemon, cmd_options, cmd_stats,
    cmd_tasks,
};
use ntclean::config::Config;
use ntclean::service::CleanerService;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let logger = Arc::new(build_logger(&config, cli.level.map(Into::into)));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            logger.error("CLI", &format!("Failed to start runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let service =
        match CleanerService::from_config(&config, runtime.handle().clone(), Arc::clone(&logger)) {
            Ok(s) => s,
            Err(e) => {
                logger.error("CLI", &format!("Failed to open task store: {e}"));
                return ExitCode::FAILURE;
            }
        };

    let json = cli.json;
    let code = match cli.command {
        Command::Accounts => cmd_accounts(&service, &logger, json),
        Command::Stats { uin, retain_days } => {
            cmd_stats(&service, &logger, &uin, retain_days.as_deref(), json)
        }
        Command::Clean {
            accounts,
            all_accounts,
            retain_days,
            skip,
        } => cmd_clean(
            &service,
            &logger,
            accounts,
            all_accounts,
            retain_days.as_deref(),
            &skip,
            json,
        ),
        Command::Options { action } => cmd_options(&service, &logger, action, json),
        Command::Tasks { action } => cmd_tasks(&service, &logger, action, json),
        Command::Daemon => cmd_daemon(&service, &logger, &runtime),
    };

    service.shutdown();
    let _ = logger.flush();
    code
}
