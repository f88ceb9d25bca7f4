//! Worker error types.

use std::borrow::Cow;

/// Result type alias for worker operations.
pub type Result<T, E = WorkerError> = std::result::Result<T, E>;

/// Worker error type.
///
/// Admin API failures never surface here: the control loop logs them and
/// retries on the next cycle.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker configuration is invalid.
    #[error("invalid worker configuration: {0}")]
    Config(Cow<'static, str>),
}

impl WorkerError {
    /// Creates a configuration error with a message.
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }
}
