//! Worker configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Result, WorkerError};

/// Default search expression: unused uploads older than a day.
pub const DEFAULT_QUERY: &str = "uploaded_at<1d AND context.unused=true";

/// Default number of resources fetched per cycle.
pub const DEFAULT_COUNT: u32 = 100;

/// Largest page the search endpoint returns.
pub const MAX_COUNT: u32 = 500;

/// Default wait between cycles, in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Control loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct WorkerConfig {
    /// Search expression selecting the resources to delete
    #[cfg_attr(
        feature = "config",
        arg(long = "query", env = "QUERY", default_value = DEFAULT_QUERY)
    )]
    #[serde(default = "default_query")]
    pub query: String,

    /// Maximum number of resources fetched and deleted per cycle
    #[cfg_attr(
        feature = "config",
        arg(long = "count", env = "COUNT", default_value_t = DEFAULT_COUNT)
    )]
    #[serde(default = "default_count")]
    pub count: u32,

    /// Seconds to wait between cycles
    #[cfg_attr(
        feature = "config",
        arg(long = "timeout", env = "TIMEOUT", default_value_t = DEFAULT_INTERVAL_SECS)
    )]
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_query() -> String {
    DEFAULT_QUERY.to_owned()
}

fn default_count() -> u32 {
    DEFAULT_COUNT
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            count: default_count(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl WorkerConfig {
    /// Creates a configuration for the given expression with default limits.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Sets the number of resources fetched per cycle.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the wait between cycles, in seconds.
    #[must_use]
    pub fn with_interval_secs(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    /// Returns the wait between cycles.
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Rejects an empty query, a count outside `1..=MAX_COUNT` and a zero
    /// interval.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(WorkerError::config("query must not be empty"));
        }

        if self.count == 0 || self.count > MAX_COUNT {
            return Err(WorkerError::config(format!(
                "count {} is invalid, must be between 1 and {MAX_COUNT}",
                self.count
            )));
        }

        if self.interval_secs == 0 {
            return Err(WorkerError::config("timeout must be at least one second"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.query, DEFAULT_QUERY);
        assert_eq!(config.count, 100);
        assert_eq!(config.interval(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(WorkerConfig::new("  ").validate().is_err());
        assert!(WorkerConfig::default().with_count(0).validate().is_err());
        assert!(WorkerConfig::default().with_count(501).validate().is_err());
        assert!(WorkerConfig::default().with_interval_secs(0).validate().is_err());
        assert!(WorkerConfig::default().with_count(500).validate().is_ok());
    }
}
