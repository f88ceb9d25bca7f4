//! Structured error handling for Admin API operations.

use std::borrow::Cow;

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while talking to the Admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Credentials or client settings are missing or invalid.
    Configuration,
    /// A local argument was rejected before any request was made.
    InvalidInput,
    /// The request could not be built, sent or read.
    Transport,
    /// The request timed out.
    Timeout,
    /// The service answered 404.
    NotFound,
    /// The service answered 429.
    RateLimited,
    /// The response body carried an `error.message`.
    ServiceError,
    /// The service answered with a status other than 200.
    UnexpectedStatus,
    /// More identifiers than a single delete call accepts.
    BatchTooLarge,
    /// A body could not be encoded or decoded.
    Serialization,
}

impl ErrorKind {
    /// Check if this error kind is typically retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport | Self::Timeout | Self::RateLimited)
    }
}

/// Structured error type with classification and the HTTP status, if any.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<Cow<'static, str>>,
    /// HTTP status code of the response that produced this error.
    pub status: Option<u16>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            source: Some(source.into()),
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Records the HTTP status the error was derived from.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Missing or invalid configuration.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration).with_message(message)
    }

    /// Transport-level failure.
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport).with_message(message)
    }

    /// Delete batch over the per-call limit.
    pub fn batch_too_large(len: usize, limit: usize) -> Self {
        Self::new(ErrorKind::BatchTooLarge)
            .with_message(format!("{len} identifiers exceed the limit of {limit}"))
    }

    /// Check if this error is retryable based on its kind and status.
    ///
    /// Server-side failures (5xx) count as retryable even though they are
    /// classified as [`ErrorKind::UnexpectedStatus`].
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
            || (self.kind == ErrorKind::UnexpectedStatus
                && self.status.is_some_and(|status| status >= 500))
    }

    /// Whether the service rejected the call because of rate limiting.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.kind == ErrorKind::RateLimited
    }

    /// Whether the service reported that the target does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        let message = error.to_string();
        Self::from_source(ErrorKind::Serialization, error).with_message(message)
    }
}
