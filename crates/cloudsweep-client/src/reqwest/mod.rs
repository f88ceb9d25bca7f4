//! Reqwest-based HTTP transport for the Admin API.
//!
//! This module provides a reqwest-based implementation of the [`Transport`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudsweep_client::reqwest::{ReqwestClient, ReqwestConfig};
//! use cloudsweep_client::{AdminApi, Credentials, TransportService};
//!
//! let credentials = Credentials::new("key", "secret", "demo")?;
//! let client = ReqwestClient::new(credentials, ReqwestConfig::default())?;
//!
//! // Convert to a service for dependency injection
//! let service: TransportService = client.into_service();
//! let api = AdminApi::new(service);
//! ```
//!
//! [`Transport`]: crate::Transport

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest transport operations.
pub const TRACING_TARGET: &str = "cloudsweep_client::reqwest";
