use anyhow::{Context, Result};
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use crate::config::LoggingConfig;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

/// Builds the log4rs config: stderr always, plus an appending file when configured.
pub fn build_config(settings: &LoggingConfig) -> Result<Config> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let mut config =
        Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = &settings.file {
        let log_file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .append(true)
            .build(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        config = config.appender(Appender::builder().build("log_file", Box::new(log_file)));
        root = root.appender("log_file");
    }

    config
        .build(root.build(settings.level))
        .context("Failed to build logging configuration")
}

/// Installs the global logger. Call once, before the pipeline runs.
pub fn init(settings: &LoggingConfig) -> Result<log4rs::Handle> {
    let config = build_config(settings)?;
    log4rs::init_config(config).context("Failed to install logger")
}
