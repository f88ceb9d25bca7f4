//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── credentials: CredentialsConfig # API key, secret, cloud name
//! ├── http: ReqwestConfig            # API URL, request timeout, user agent
//! ├── worker: WorkerConfig           # Query, count, wait between cycles
//! └── debug: bool                    # Log format and verbosity
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! CLOUDINARY_API_KEY=... CLOUDINARY_API_SECRET=... CLOUDINARY_CLOUD_NAME=demo \
//!     QUERY="tags=tmp" TIMEOUT=60 cloudsweep
//! ```

mod credentials;

use std::process;

use anyhow::Context;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use cloudsweep_client::reqwest::ReqwestConfig;
use cloudsweep_worker::WorkerConfig;
pub use credentials::CredentialsConfig;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "cloudsweep")]
#[command(about = "Deletes Cloudinary resources matching a search expression")]
#[command(version)]
pub struct Cli {
    /// Cloudinary account credentials.
    #[clap(flatten)]
    pub credentials: CredentialsConfig,

    /// Admin API transport configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,

    /// Purge loop configuration.
    #[clap(flatten)]
    pub worker: WorkerConfig,

    /// Human-readable debug logs; JSON lines at info level when disabled
    #[arg(
        long,
        env = "DEBUG",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.worker
            .validate()
            .context("invalid worker configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cloud_name = ?self.credentials.cloud_name,
            api_url = %self.http.api_url,
            http_timeout_secs = self.http.http_timeout,
            query = %self.worker.query,
            count = self.worker.count,
            interval_secs = self.worker.interval_secs,
            debug = self.debug,
            "Sweeper configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
