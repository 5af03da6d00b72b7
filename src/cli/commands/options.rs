//! `ntclean options show|set`.

use super::accounts::exit;
use crate::cli::OptionsAction;
use crate::cli::util::emit_json;
use crate::engine::{CleanOptions, OptionsPatch, parse_retain_days};
use crate::logger::Logger;
use crate::paths::Category;
use crate::service::CleanerService;
use std::process::ExitCode;

#[must_use]
pub fn cmd_options(
    service: &CleanerService,
    logger: &Logger,
    action: Option<OptionsAction>,
    json: bool,
) -> ExitCode {
    let options = match action.unwrap_or(OptionsAction::Show) {
        OptionsAction::Show => service.default_options(),
        OptionsAction::Set {
            retain_days,
            enable,
            disable,
        } => {
            let mut patch = OptionsPatch::new();
            if let Some(days) = retain_days {
                patch = patch.retain_days(parse_retain_days(&days));
            }
            for category in enable {
                patch = patch.set(category, true);
            }
            for category in disable {
                patch = patch.set(category, false);
            }
            let options = service.set_default_options(&patch);
            logger.info("OPTIONS", "Default options updated");
            options
        }
    };

    if json {
        return exit(emit_json(logger, &options));
    }
    print_options(logger, &options);
    ExitCode::SUCCESS
}

fn print_options(logger: &Logger, options: &CleanOptions) {
    logger.print(
        "OPTIONS",
        &format!("Retain files newer than {} days", options.retain_days),
    );
    for category in Category::ALL {
        logger.raw(&format!(
            "  {:<12} {}",
            category.as_str(),
            if options.is_enabled(category) { "on" } else { "off" }
        ));
    }
}
