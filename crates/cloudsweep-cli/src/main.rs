#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod shutdown;
mod telemetry;

use std::process;

use anyhow::Context;
use cloudsweep_client::AdminApi;
use cloudsweep_client::reqwest::ReqwestClient;
use cloudsweep_worker::PurgeWorker;
use tokio_util::sync::CancellationToken;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "cloudsweep::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "cloudsweep::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "cloudsweep::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.debug)?;
    cli.log();
    cli.validate()?;

    let worker = create_worker(&cli)?;

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown::shutdown_signal(cancel.clone()));

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting cloudsweep"
    );

    worker.run(cancel).await;

    Ok(())
}

/// Creates the purge worker from configuration.
fn create_worker(cli: &Cli) -> anyhow::Result<PurgeWorker> {
    let credentials = cli.credentials.credentials()?;

    let client = ReqwestClient::new(credentials, cli.http.clone())
        .context("failed to create admin api client")?;
    let api = AdminApi::new(client.into_service());

    PurgeWorker::new(api, cli.worker.clone()).context("failed to create purge worker")
}
