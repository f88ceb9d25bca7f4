#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
pub mod handler;

pub use config::{DEFAULT_COUNT, DEFAULT_INTERVAL_SECS, DEFAULT_QUERY, MAX_COUNT, WorkerConfig};
pub use error::{Result, WorkerError};
pub use handler::{CycleOutcome, PurgeSummary, PurgeWorker};
