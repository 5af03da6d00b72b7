//! Logger configuration from the `[general]`, `[terminal]` and `[file]` sections.

use super::{Logger, LoggerBuilder};
use crate::config::Config;
use crate::level::Level;

impl Logger {
    /// Builds the terminal and file outputs the config enables.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_at(config, config.parse_level())
    }

    /// Same as [`from_config`](Self::from_config) with the level overridden.
    #[must_use]
    pub fn from_config_at(config: &Config, level: Level) -> Self {
        let mut builder = LoggerBuilder::new().level(level);

        if config.terminal.enabled {
            builder = builder
                .terminal()
                .colors(config.terminal.colors)
                .done();
        }

        if config.file.enabled {
            builder = builder
                .file()
                .base_dir(config.log_dir())
                .app_name(config.general.app_name.clone())
                .done();
        }

        let logger = builder.build();
        logger.debug(
            "LOGGER",
            &format!(
                "Logger ready: level={}, outputs={}",
                logger.min_level(),
                logger.output_count()
            ),
        );
        logger
    }
}
