//! Error types.
//!
//! Editing never fails: malformed input degrades to literal text. Errors only exist at the two
//! integration edges, the mention search callback and log sink setup.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a mention search callback. Swallowed by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MentionSearchError {
    #[error("mention search failed: {0}")]
    Failed(String),

    #[error("mention search was cancelled")]
    Cancelled,
}

impl MentionSearchError {
    pub fn failed(message: impl Into<String>) -> Self {
        MentionSearchError::Failed(message.into())
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("I/O error while opening log file at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install logger: {0}")]
    Install(#[from] log::SetLoggerError),
}

#[cfg(test)]
mod tests {
    use super::{LoggingError, MentionSearchError};

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            MentionSearchError::failed("timeout").to_string(),
            "mention search failed: timeout"
        );
        let open = LoggingError::Open {
            path: "/nope/log.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            open.to_string(),
            "I/O error while opening log file at /nope/log.txt: missing"
        );
    }
}
