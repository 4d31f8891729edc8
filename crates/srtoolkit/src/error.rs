use std::time::Duration;

/// Unified error type for the srtoolkit crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Missing or malformed configuration or settings.
    #[error("configuration error: {0}")]
    Config(String),
    /// The tab, context or worker a message was addressed to is gone.
    #[error("target unavailable: {0}")]
    MissingTarget(String),
    /// A worker did not answer in time.
    #[error("{what} timed out after {after:?}")]
    Timeout { what: String, after: Duration },
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
