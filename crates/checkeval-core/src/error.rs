//! Error taxonomy for checker evaluation.

use std::time::Duration;

/// Errors produced while invoking the checker or scoring its output.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("invocation for {fixture} has an empty command")]
    EmptyCommand { fixture: String },

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("checker run on {fixture} timed out after {timeout:?}")]
    Timeout { fixture: String, timeout: Duration },

    #[error("checker run on {fixture} terminated without an exit code")]
    AbnormalExit { fixture: String },

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("{metric} is undefined: {denominator} = 0")]
    UndefinedMetric {
        metric: &'static str,
        denominator: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
