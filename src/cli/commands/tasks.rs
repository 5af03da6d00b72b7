//! `ntclean tasks list|add|update|remove|run`.

use super::accounts::exit;
use crate::cli::util::{describe_task, emit_json};
use crate::cli::{TaskArgs, TasksAction};
use crate::engine::{CleanOptions, OptionsPatch, parse_retain_days};
use crate::logger::Logger;
use crate::schedule::{TaskDraft, TaskPatch};
use crate::service::CleanerService;
use std::process::ExitCode;

#[must_use]
pub fn cmd_tasks(
    service: &CleanerService,
    logger: &Logger,
    action: Option<TasksAction>,
    json: bool,
) -> ExitCode {
    match action.unwrap_or(TasksAction::List) {
        TasksAction::List => {
            let tasks = service.tasks();
            if json {
                return exit(emit_json(logger, &tasks));
            }
            if tasks.is_empty() {
                logger.print("TASKS", "No scheduled tasks");
            }
            for task in &tasks {
                logger.print("TASKS", &describe_task(task));
                if let (Some(at), Some(result)) = (&task.last_run, &task.last_result) {
                    logger.raw(&format!("  last run {}: {result}", at.to_rfc3339()));
                }
            }
            ExitCode::SUCCESS
        }
        TasksAction::Add { task } => {
            let created = service.create_task(draft_from(task));
            if json {
                return exit(emit_json(logger, &created));
            }
            logger.print("TASKS", &format!("Created {}", describe_task(&created)));
            ExitCode::SUCCESS
        }
        TasksAction::Update { id, task, enable } => {
            let current = match service.task(&id) {
                Ok(current) => current,
                Err(e) => {
                    logger.error("TASKS", &e.to_string());
                    return ExitCode::FAILURE;
                }
            };
            let patch = patch_from(task, enable, current.options);
            match service.update_task(&id, patch) {
                Ok(updated) if json => exit(emit_json(logger, &updated)),
                Ok(updated) => {
                    logger.print("TASKS", &format!("Updated {}", describe_task(&updated)));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    logger.error("TASKS", &e.to_string());
                    ExitCode::FAILURE
                }
            }
        }
        TasksAction::Remove { id } => match service.delete_task(&id) {
            Ok(removed) => {
                logger.print("TASKS", &format!("Removed [{}] {}", removed.name, removed.id));
                ExitCode::SUCCESS
            }
            Err(e) => {
                logger.error("TASKS", &e.to_string());
                ExitCode::FAILURE
            }
        },
        TasksAction::Run { id } => match service.run_task_now(&id) {
            Ok(report) if json => exit(emit_json(logger, &report)),
            Ok(report) => {
                logger.print(
                    "TASKS",
                    &format!("[{}] {}", report.task_name, report.summary()),
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                logger.error("TASKS", &e.to_string());
                ExitCode::FAILURE
            }
        },
    }
}

fn draft_from(args: TaskArgs) -> TaskDraft {
    let mut options = OptionsPatch::new();
    for category in &args.skip {
        options = options.set(*category, false);
    }
    TaskDraft {
        name: args.name,
        accounts: Some(args.accounts),
        options: Some(options),
        retain_days: args.retain_days.as_deref().map(parse_retain_days),
        cron_hour: args.hour,
        cron_minute: args.minute,
        frequency: args.frequency,
        frequency_value: args.every,
        enabled: Some(!args.disable),
    }
}

/// Only flags that were given end up in the patch. Options are replaced
/// whole, so they start from the task's current ones.
fn patch_from(args: TaskArgs, enable: bool, current: CleanOptions) -> TaskPatch {
    let options = if args.retain_days.is_some() || !args.skip.is_empty() {
        let mut options = current;
        if let Some(days) = args.retain_days.as_deref() {
            options.retain_days = parse_retain_days(days);
        }
        for category in &args.skip {
            options = options.with_category(*category, false);
        }
        Some(options)
    } else {
        None
    };

    TaskPatch {
        name: args.name,
        accounts: (!args.accounts.is_empty()).then_some(args.accounts),
        options,
        cron_hour: args.hour,
        cron_minute: args.minute,
        frequency: args.frequency,
        frequency_value: args.every,
        enabled: if enable {
            Some(true)
        } else if args.disable {
            Some(false)
        } else {
            None
        },
    }
}
