//! Raw Admin API responses and their classification.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{Error, ErrorKind, Result};

/// Raw response of an Admin API call, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Fully resolved URL the request was sent to.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase of the status, if known.
    pub reason: Option<String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// Error envelope returned by the service: `{"error": {"message": "..."}}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiResponse {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: String::new(),
            status,
            reason: None,
            body: body.into(),
        }
    }

    /// Sets the URL the response was received from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the reason phrase of the status.
    pub fn with_reason(mut self, reason: Option<&str>) -> Self {
        self.reason = reason.map(str::to_owned);
        self
    }

    /// Returns the status line text, e.g. `500 Internal Server Error`.
    pub fn status_text(&self) -> String {
        match &self.reason {
            Some(reason) => format!("{} {reason}", self.status),
            None => self.status.to_string(),
        }
    }

    /// Returns the non-empty `error.message` embedded in the body, if any.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorEnvelope>(&self.body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|error| error.message)
            .filter(|message| !message.is_empty())
    }

    /// Classifies the response and decodes a successful body into `T`.
    ///
    /// Checks run in this order: 404, embedded error message, 429, any
    /// other status than 200, body decoding. A 429 without an embedded
    /// message is reported as [`RateLimited`](ErrorKind::RateLimited) rather
    /// than as an unexpected status, so callers can tell throttling apart.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](ErrorKind::NotFound),
    /// [`ServiceError`](ErrorKind::ServiceError),
    /// [`RateLimited`](ErrorKind::RateLimited),
    /// [`UnexpectedStatus`](ErrorKind::UnexpectedStatus) or
    /// [`Serialization`](ErrorKind::Serialization).
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if self.status == 404 {
            return Err(Error::new(ErrorKind::NotFound)
                .with_message(format!("resource not found: {}", self.url))
                .with_status(self.status));
        }

        if let Some(message) = self.error_message() {
            return Err(Error::new(ErrorKind::ServiceError)
                .with_message(message)
                .with_status(self.status));
        }

        if self.status == 429 {
            return Err(Error::new(ErrorKind::RateLimited)
                .with_message(self.status_text())
                .with_status(self.status));
        }

        if self.status != 200 {
            return Err(Error::new(ErrorKind::UnexpectedStatus)
                .with_message(self.status_text())
                .with_status(self.status));
        }

        serde_json::from_slice(&self.body).map_err(|e| Error::from(e).with_status(self.status))
    }
}
