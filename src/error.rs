//! Error types and handling for lazyseq
//!
//! Every sequence carries `StreamResult<T>` items. An `Err` is always the
//! last item a sequence produces: operators forward it unchanged and stop.

use thiserror::Error;

/// Main error type for sequence operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A value used as a source exposes neither sync nor async iteration
    #[error("value is not iterable: {found}")]
    NotIterable { found: &'static str },
    /// Failure reported by the underlying source while iterating
    #[error("source failed: {0}")]
    Source(String),
    /// Failure returned by a user-supplied callback
    #[error("callback failed: {0}")]
    Callback(String),
    /// A bounded materialization saw more elements than allowed
    #[error("sequence exceeded the limit of {limit} elements")]
    CapacityExceeded { limit: usize },
}

impl StreamError {
    /// Shorthand for a failure raised by a source
    pub fn source<M: Into<String>>(msg: M) -> Self {
        StreamError::Source(msg.into())
    }

    /// Shorthand for a failure raised by a callback
    pub fn callback<M: Into<String>>(msg: M) -> Self {
        StreamError::Callback(msg.into())
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Source(err.to_string())
    }
}

/// Result type for sequence operations
pub type StreamResult<T> = Result<T, StreamError>;
