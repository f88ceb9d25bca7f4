//! Tracing initialization and configuration.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter directives in debug mode.
const DEBUG_DIRECTIVES: &str = "info,cloudsweep=debug,cloudsweep_client=debug,cloudsweep_worker=debug";

/// Default filter directives otherwise.
const DEFAULT_DIRECTIVES: &str = "info";

/// Initializes the tracing subscriber for structured logging.
///
/// # Configuration
///
/// The log level can be configured via the `RUST_LOG` environment variable,
/// which takes precedence over the defaults selected by `debug`.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug cloudsweep
/// RUST_LOG=cloudsweep_worker=trace,reqwest=debug cloudsweep
/// ```
pub(super) fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let env_filter = create_env_filter(debug)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if debug {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(false))
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

/// Creates an environment filter for tracing.
fn create_env_filter(debug: bool) -> anyhow::Result<EnvFilter> {
    let directives = if debug {
        DEBUG_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}
