//! Query-and-purge control loop.

use cloudsweep_client::{AdminApi, Error as ClientError, MAX_BATCH_SIZE};
use tokio_util::sync::CancellationToken;

use crate::{Result, WorkerConfig};

/// Tracing target for purge worker operations.
const TRACING_TARGET: &str = "cloudsweep_worker::handler::purge";

/// Totals of a successful purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PurgeSummary {
    /// Number of identifiers submitted for deletion.
    pub count: usize,
    /// Number of delete calls that succeeded.
    pub batches: usize,
    /// Identifiers covered by the successful delete calls.
    pub processed: usize,
    /// Identifiers the service reported as deleted.
    pub deleted: usize,
    /// Identifiers the service reported as not found.
    pub not_found: usize,
}

impl PurgeSummary {
    /// Returns the number of identifiers no delete call has covered yet.
    pub fn remaining(&self) -> usize {
        self.count.saturating_sub(self.processed)
    }
}

/// Result of a single query-then-purge cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The search matched nothing.
    Idle,
    /// Every matched resource was submitted for deletion.
    Purged(PurgeSummary),
    /// The search failed; nothing was deleted.
    QueryFailed(ClientError),
    /// A delete call failed; the remaining batches were skipped.
    PurgeFailed {
        /// Error of the failed delete call.
        error: ClientError,
        /// Totals of the batches deleted before the failure.
        summary: PurgeSummary,
    },
}

impl CycleOutcome {
    /// Returns whether the cycle ended with an error.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::QueryFailed(_) | Self::PurgeFailed { .. })
    }
}

/// Periodically deletes the resources matching a search expression.
///
/// Each cycle searches once, deletes the returned page in batches of at
/// most [`MAX_BATCH_SIZE`] and then waits for the configured interval.
/// Failures are logged and the whole cycle is retried after the wait; the
/// next search starts from scratch.
#[derive(Debug, Clone)]
pub struct PurgeWorker {
    api: AdminApi,
    config: WorkerConfig,
}

impl PurgeWorker {
    /// Create a new purge worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(api: AdminApi, config: WorkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { api, config })
    }

    /// Returns the worker configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run the purge worker until cancelled.
    ///
    /// Cancellation is only observed between cycles, so a cycle that has
    /// started always runs to completion.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            target: TRACING_TARGET,
            query = %self.config.query,
            count = self.config.count,
            interval_secs = self.config.interval_secs,
            "Starting purge worker"
        );

        let interval = self.config.interval();

        while !cancel.is_cancelled() {
            self.run_cycle().await;

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        "Purge worker shutdown requested"
                    );
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            "Purge worker stopped"
        );
    }

    /// Runs one search and, if anything matched, one purge.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let page = match self.api.search(&self.config.query, self.config.count).await {
            Ok(page) => page,
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %err,
                    kind = %err.kind,
                    "Failed to search resources"
                );
                return CycleOutcome::QueryFailed(err);
            }
        };

        if page.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                total_count = page.total_count,
                "No objects to delete"
            );
            return CycleOutcome::Idle;
        }

        let ids = page.public_ids();

        tracing::info!(
            target: TRACING_TARGET,
            count = ids.len(),
            total_count = page.total_count,
            ids = ?ids,
            "Found objects to delete"
        );

        let (summary, failure) = self.purge(&ids).await;
        match failure {
            None => {
                tracing::info!(
                    target: TRACING_TARGET,
                    count = summary.count,
                    deleted = summary.deleted,
                    not_found = summary.not_found,
                    ids = ?ids,
                    "Objects deleted"
                );
                CycleOutcome::Purged(summary)
            }
            Some(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    kind = %error.kind,
                    count = summary.remaining(),
                    batches = summary.batches,
                    deleted = summary.deleted,
                    not_found = summary.not_found,
                    "Failed to delete objects"
                );
                CycleOutcome::PurgeFailed { error, summary }
            }
        }
    }

    /// Deletes `ids` in batches, stopping at the first failed batch.
    ///
    /// The summary always covers the batches that succeeded.
    async fn purge(&self, ids: &[String]) -> (PurgeSummary, Option<ClientError>) {
        let mut summary = PurgeSummary {
            count: ids.len(),
            ..PurgeSummary::default()
        };

        for batch in ids.chunks(MAX_BATCH_SIZE) {
            let outcome = match self.api.batch_delete(batch).await {
                Ok(outcome) => outcome,
                Err(error) => return (summary, Some(error)),
            };

            summary.batches += 1;
            summary.processed += batch.len();
            summary.deleted += outcome.deleted_count();
            summary.not_found += outcome.not_found_count();

            if outcome.partial {
                tracing::warn!(
                    target: TRACING_TARGET,
                    batch = summary.batches,
                    size = batch.len(),
                    "Service reported a partial deletion"
                );
            }
        }

        (summary, None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use cloudsweep_client::{
        ApiRequest, ApiResponse, Error, ErrorKind, Method, Transport, TransportService,
    };
    use serde_json::{Value, json};

    use super::*;

    type Reply = std::result::Result<ApiResponse, ErrorKind>;

    /// Transport replaying scripted replies and recording every request.
    ///
    /// Once the script runs out every call fails with a transport error.
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        requests: Arc<Mutex<Vec<ApiRequest>>>,
        replies: Arc<Mutex<VecDeque<Reply>>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: Value) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(ApiResponse::new(status, body.to_string())));
            self
        }

        fn fail(self, kind: ErrorKind) -> Self {
            self.replies.lock().unwrap().push_back(Err(kind));
            self
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn methods(&self) -> Vec<Method> {
            self.requests().iter().map(|request| request.method).collect()
        }

        fn worker(&self, config: WorkerConfig) -> PurgeWorker {
            let api = AdminApi::new(TransportService::new(self.clone()));
            PurgeWorker::new(api, config).unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: &ApiRequest) -> cloudsweep_client::Result<ApiResponse> {
            self.requests.lock().unwrap().push(request.clone());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(kind)) => Err(Error::new(kind).with_message("scripted failure")),
                None => Err(Error::transport("script exhausted")),
            }
        }
    }

    fn page(ids: &[&str]) -> Value {
        let resources: Vec<Value> = ids
            .iter()
            .map(|id| json!({"public_id": id, "resource_type": "image", "type": "upload"}))
            .collect();
        json!({"total_count": ids.len(), "resources": resources})
    }

    fn deleted(ids: &[String]) -> Value {
        let statuses: serde_json::Map<String, Value> = ids
            .iter()
            .map(|id| (id.clone(), Value::from("deleted")))
            .collect();
        json!({"deleted": statuses, "partial": false})
    }

    fn public_ids(request: &ApiRequest) -> Vec<String> {
        serde_json::from_value(request.body["public_ids"].clone()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let api = AdminApi::new(TransportService::new(ScriptedTransport::default()));
        let result = PurgeWorker::new(api, WorkerConfig::default().with_count(0));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_search_does_not_purge() {
        let transport =
            ScriptedTransport::default().reply(200, json!({"total_count": 0, "resources": []}));
        let worker = transport.worker(WorkerConfig::new("X"));

        let outcome = worker.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Idle));
        assert!(!outcome.is_failure());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body["expression"], "X");
        assert_eq!(requests[0].body["max_results"], 100);
    }

    #[tokio::test]
    async fn test_matches_are_purged() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let transport = ScriptedTransport::default()
            .reply(200, page(&["a", "b", "c"]))
            .reply(200, deleted(&ids));
        let worker = transport.worker(WorkerConfig::default());

        let summary = match worker.run_cycle().await {
            CycleOutcome::Purged(summary) => summary,
            other => panic!("expected purge, got {other:?}"),
        };
        assert_eq!(summary.count, 3);
        assert_eq!(summary.deleted, 3);
        assert_eq!(summary.batches, 1);

        let requests = transport.requests();
        assert_eq!(transport.methods(), vec![Method::Post, Method::Delete]);
        assert_eq!(public_ids(&requests[1]), ids);
    }

    /// In-memory sink for formatted log lines.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn lines_with(&self, message: &str) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .filter(|line| line.contains(message))
                .map(str::to_owned)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_purge_logs_discovery_and_completion() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let transport = ScriptedTransport::default()
            .reply(200, page(&["a", "b", "c"]))
            .reply(200, deleted(&ids));
        let worker = transport.worker(WorkerConfig::default());

        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let outcome = worker.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Purged(_)));

        for message in ["Found objects to delete", "Objects deleted"] {
            let lines = logs.lines_with(message);
            assert_eq!(lines.len(), 1, "{message}");
            assert!(lines[0].contains("INFO"), "{}", lines[0]);
            assert!(lines[0].contains("count=3"), "{}", lines[0]);
        }
    }

    #[tokio::test]
    async fn test_failed_batch_logs_remaining_count() {
        let names: Vec<String> = (0..150).map(|i| format!("asset-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let transport = ScriptedTransport::default()
            .reply(200, page(&refs))
            .reply(200, deleted(&names[..100]))
            .fail(ErrorKind::Transport);
        let worker = transport.worker(WorkerConfig::default().with_count(150));

        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let outcome = worker.run_cycle().await;
        assert!(outcome.is_failure());

        let lines = logs.lines_with("Failed to delete objects");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"), "{}", lines[0]);
        assert!(lines[0].contains("count=50"), "{}", lines[0]);
        assert!(lines[0].contains("deleted=100"), "{}", lines[0]);
        assert!(lines[0].contains("batches=1"), "{}", lines[0]);
    }

    #[tokio::test]
    async fn test_failed_search_skips_purge() {
        let transport = ScriptedTransport::default().fail(ErrorKind::Transport);
        let worker = transport.worker(WorkerConfig::default());

        let outcome = worker.run_cycle().await;
        assert!(outcome.is_failure());
        assert!(matches!(
            outcome,
            CycleOutcome::QueryFailed(ref err) if err.kind == ErrorKind::Transport
        ));
        assert_eq!(transport.methods(), vec![Method::Post]);
    }

    #[tokio::test]
    async fn test_failed_purge_requeries_next_cycle() {
        let transport = ScriptedTransport::default()
            .reply(200, page(&["a", "b"]))
            .reply(500, json!({}))
            .reply(200, page(&[]));
        let worker = transport.worker(WorkerConfig::default());

        let first = worker.run_cycle().await;
        assert!(matches!(
            first,
            CycleOutcome::PurgeFailed { ref error, summary }
                if error.kind == ErrorKind::UnexpectedStatus && summary.remaining() == 2
        ));

        let second = worker.run_cycle().await;
        assert!(matches!(second, CycleOutcome::Idle));
        assert_eq!(
            transport.methods(),
            vec![Method::Post, Method::Delete, Method::Post]
        );
    }

    #[tokio::test]
    async fn test_large_pages_are_split_into_batches() {
        let names: Vec<String> = (0..250).map(|i| format!("asset-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let transport = ScriptedTransport::default()
            .reply(200, page(&refs))
            .reply(200, deleted(&names[..100]))
            .reply(200, deleted(&names[100..200]))
            .reply(200, deleted(&names[200..]));
        let worker = transport.worker(WorkerConfig::default().with_count(250));

        let summary = match worker.run_cycle().await {
            CycleOutcome::Purged(summary) => summary,
            other => panic!("expected purge, got {other:?}"),
        };
        assert_eq!(summary.batches, 3);
        assert_eq!(summary.deleted, 250);

        let sizes: Vec<usize> = transport.requests()[1..]
            .iter()
            .map(|request| public_ids(request).len())
            .collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[tokio::test]
    async fn test_failed_batch_stops_the_purge() {
        let names: Vec<String> = (0..150).map(|i| format!("asset-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let transport = ScriptedTransport::default()
            .reply(200, page(&refs))
            .reply(200, deleted(&names[..100]))
            .fail(ErrorKind::RateLimited);
        let worker = transport.worker(WorkerConfig::default().with_count(150));

        let (error, summary) = match worker.run_cycle().await {
            CycleOutcome::PurgeFailed { error, summary } => (error, summary),
            other => panic!("expected purge failure, got {other:?}"),
        };
        assert!(error.is_rate_limited());
        assert_eq!(summary.count, 150);
        assert_eq!(summary.batches, 1);
        assert_eq!(summary.processed, 100);
        assert_eq!(summary.deleted, 100);
        assert_eq!(summary.remaining(), 50);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_between_cycles() {
        let transport = ScriptedTransport::default()
            .fail(ErrorKind::Transport)
            .reply(200, page(&[]))
            .reply(200, page(&["a"]))
            .reply(200, deleted(&["a".to_string()]));
        let worker = transport.worker(WorkerConfig::default().with_interval_secs(10));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let cancel = cancel.clone();
            async move { worker.run(cancel).await }
        });

        // Cycles start at 0s, 10s and 20s; the next one would start at 30s.
        tokio::time::sleep(Duration::from_secs(25)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(
            transport.methods(),
            vec![Method::Post, Method::Post, Method::Post, Method::Delete]
        );
    }

    #[tokio::test]
    async fn test_run_returns_when_already_cancelled() {
        let transport = ScriptedTransport::default();
        let worker = transport.worker(WorkerConfig::default());

        let cancel = CancellationToken::new();
        cancel.cancel();
        worker.run(cancel).await;

        assert!(transport.requests().is_empty());
    }
}
