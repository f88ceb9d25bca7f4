//! Transport service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;

use crate::{ApiRequest, ApiResponse, Result, TRACING_TARGET, Transport};

/// Transport service wrapper with observability.
///
/// This wrapper emits one audit record per call for any [`Transport`]
/// implementation. The inner transport is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct TransportService {
    inner: Arc<dyn Transport>,
}

impl fmt::Debug for TransportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportService").finish_non_exhaustive()
    }
}

impl TransportService {
    /// Create a new transport service wrapper.
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self {
            inner: Arc::new(transport),
        }
    }

    /// Executes a request and returns the unclassified response.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let started_at = Instant::now();
        let result = self.inner.execute(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    method = %request.method,
                    url = %response.url,
                    body = %request.body_json(),
                    duration_ms = elapsed.as_millis(),
                    status = %response.status_text(),
                    "{} {}",
                    request.method,
                    request.action
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    method = %request.method,
                    url = %self.inner.url(&request.action),
                    body = %request.body_json(),
                    duration_ms = elapsed.as_millis(),
                    error = %error,
                    "{} {} failed",
                    request.method,
                    request.action
                );
            }
        }

        result
    }

    /// Executes a request and decodes the classified response into `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        self.execute(request).await?.decode()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;
    use crate::Error;

    struct Unreachable;

    #[async_trait::async_trait]
    impl Transport for Unreachable {
        async fn execute(&self, _request: &ApiRequest) -> Result<ApiResponse> {
            Err(Error::transport("connection refused"))
        }

        fn url(&self, action: &str) -> String {
            format!("http://unreachable.test/{action}")
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_call_is_logged_with_url() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let service = TransportService::new(Unreachable);
        let error = service
            .execute(&ApiRequest::post("resources/search"))
            .await
            .unwrap_err();
        assert!(error.is_retryable());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let line = output
            .lines()
            .find(|line| line.contains("failed"))
            .unwrap();
        assert!(line.contains("ERROR"), "{line}");
        assert!(
            line.contains("url=http://unreachable.test/resources/search"),
            "{line}"
        );
        assert!(line.contains("duration_ms="), "{line}");
    }
}
