//! `ntclean daemon`: arm every task and keep the process alive until Ctrl-C.

use crate::engine::format_size;
use crate::logger::Logger;
use crate::service::CleanerService;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::RecvError;

#[must_use]
pub fn cmd_daemon(service: &CleanerService, logger: &Logger, runtime: &Runtime) -> ExitCode {
    let mut reports = service.scheduler().subscribe();
    service.start();
    logger.info(
        "DAEMON",
        &format!(
            "{} tasks armed, watching {}",
            service.scheduler().active(),
            service.base().display()
        ),
    );

    let result = runtime.block_on(async {
        loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => break signal,
                report = reports.recv() => match report {
                    Ok(report) => logger.info(
                        "DAEMON",
                        &format!(
                            "[{}] freed {} across {} accounts",
                            report.task_name,
                            format_size(report.report.total_size),
                            report.report.accounts.len()
                        ),
                    ),
                    Err(RecvError::Lagged(n)) => {
                        logger.warn("DAEMON", &format!("Missed {n} run reports"));
                    }
                    Err(RecvError::Closed) => break tokio::signal::ctrl_c().await,
                },
            }
        }
    });

    service.shutdown();
    match result {
        Ok(()) => {
            logger.info("DAEMON", "Stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger.error("DAEMON", &format!("Cannot listen for Ctrl-C: {e}"));
            ExitCode::FAILURE
        }
    }
}
