//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

/// Initializes the tracing subscriber.
///
/// `debug` selects human-readable output at debug level for the sweeper's
/// own crates; otherwise JSON lines are emitted at info level.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(debug: bool) -> anyhow::Result<()> {
    tracing::init_tracing(debug).context("Failed to initialize tracing")
}
