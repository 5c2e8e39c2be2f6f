//! Optional file log sink for the `log` facade.
//!
//! The library only emits through `log::*!`; nothing is written anywhere unless the host installs
//! a logger. [`init_from_env`] installs a `simplelog` [`WriteLogger`] when `INPUT_EMOJI_WRITE_LOG`
//! names a file.

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};
use time::UtcOffset;

use crate::config::EnvConfig;
use crate::error::LoggingError;

/// RFC 3339 timestamps in UTC, target shown on every record.
pub fn log_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder.set_time_offset(UtcOffset::UTC);
    builder.set_time_format_rfc3339();
    builder.set_target_level(LevelFilter::Error);
    builder.build()
}

/// Logger appending to `path`, created if missing.
pub fn file_logger(
    path: impl AsRef<Path>,
    level: LevelFilter,
) -> Result<Box<WriteLogger<File>>, LoggingError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(WriteLogger::new(level, log_config(), file))
}

fn level_for(config: &EnvConfig) -> LevelFilter {
    if config.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the file logger described by `config`. Returns `false` when no log file is configured.
pub fn init(config: &EnvConfig) -> Result<bool, LoggingError> {
    let Some(path) = config.write_log.as_deref() else {
        return Ok(false);
    };
    let level = level_for(config);
    let logger = file_logger(path, level)?;
    log::set_boxed_logger(logger)?;
    log::set_max_level(level);
    log::info!("logging to {path} at {level}");
    Ok(true)
}

pub fn init_from_env() -> Result<bool, LoggingError> {
    init(&EnvConfig::from_env())
}
