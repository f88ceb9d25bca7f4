//! Error types for the reqwest-based transport.

use thiserror::Error;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The configured API URL cannot carry a path.
    #[error("API URL cannot be a base: {0}")]
    InvalidBaseUrl(url::Url),
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::new(crate::ErrorKind::Timeout)
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    crate::Error::transport("Connection failed").with_source(e)
                } else {
                    crate::Error::transport(e.to_string()).with_source(e)
                }
            }
            Error::Serde(e) => crate::Error::from(e),
            Error::InvalidBaseUrl(url) => {
                crate::Error::configuration(format!("API URL cannot be a base: {url}"))
            }
        }
    }
}
