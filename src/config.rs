//! Environment configuration.

use std::env;

pub const DEBUG_VAR: &str = "INPUT_EMOJI_DEBUG";
pub const WRITE_LOG_VAR: &str = "INPUT_EMOJI_WRITE_LOG";
pub const RESIZE_DEBOUNCE_VAR: &str = "INPUT_EMOJI_RESIZE_DEBOUNCE_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Log at debug level instead of info.
    pub debug: bool,
    /// Path of the log file; logging stays off without one.
    pub write_log: Option<String>,
    /// Default resize debounce window for new widgets.
    pub resize_debounce_ms: Option<u64>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag(DEBUG_VAR),
            write_log: env_string_opt(WRITE_LOG_VAR),
            resize_debounce_ms: env_u64_opt(RESIZE_DEBOUNCE_VAR),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_u64_opt(key: &str) -> Option<u64> {
    let value = env_string_opt(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring {key}={value:?}: not a whole number of milliseconds");
            None
        }
    }
}
