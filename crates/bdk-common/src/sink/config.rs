//! Sink configuration
//!
//! Defaults match the behavior callers expect from a log sink: a queue of
//! 1000 records, a one second flush cadence under load and at most ten write
//! calls per record.

use crate::error::{BdkError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Sink Configuration Constants
// ============================================================================

/// Default number of records the queue holds before producers wait.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default interval between timer-driven flushes while the queue is busy.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of write calls spent on a single record.
pub const DEFAULT_MAX_WRITE_ATTEMPTS: usize = 10;

/// Default deadline callers give `close`.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for an [`AsyncLogSink`](super::AsyncLogSink)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Queue capacity in records
    pub capacity: usize,

    /// Flush cadence while records keep arriving
    pub flush_interval: Duration,

    /// Write calls allowed per record before the remainder is abandoned
    pub max_write_attempts: usize,

    /// How long owners of the sink wait for the drain on shutdown
    pub close_timeout: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}

impl SinkConfig {
    /// Create a new SinkConfig with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `BDK_SINK_CAPACITY`: Queue capacity in records
    /// - `BDK_SINK_FLUSH_INTERVAL_MS`: Timer flush interval in milliseconds
    /// - `BDK_SINK_MAX_WRITE_ATTEMPTS`: Write calls per record
    /// - `BDK_SINK_CLOSE_TIMEOUT_MS`: Close deadline in milliseconds
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("BDK_SINK_CAPACITY") {
            config.capacity = parse_env("BDK_SINK_CAPACITY", &val)?;
        }

        if let Ok(val) = std::env::var("BDK_SINK_FLUSH_INTERVAL_MS") {
            config.flush_interval =
                Duration::from_millis(parse_env("BDK_SINK_FLUSH_INTERVAL_MS", &val)?);
        }

        if let Ok(val) = std::env::var("BDK_SINK_MAX_WRITE_ATTEMPTS") {
            config.max_write_attempts = parse_env("BDK_SINK_MAX_WRITE_ATTEMPTS", &val)?;
        }

        if let Ok(val) = std::env::var("BDK_SINK_CLOSE_TIMEOUT_MS") {
            config.close_timeout =
                Duration::from_millis(parse_env("BDK_SINK_CLOSE_TIMEOUT_MS", &val)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> SinkConfigBuilder {
        SinkConfigBuilder::default()
    }

    /// Reject values the sink cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(BdkError::config("sink capacity must be greater than zero"));
        }
        if self.flush_interval.is_zero() {
            return Err(BdkError::config("sink flush interval must be greater than zero"));
        }
        if self.max_write_attempts == 0 {
            return Err(BdkError::config(
                "sink max write attempts must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BdkError::config(format!("invalid value for {}: {:?}", name, value)))
}

/// Builder for SinkConfig
#[derive(Default)]
pub struct SinkConfigBuilder {
    config: SinkConfig,
}

impl SinkConfigBuilder {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    pub fn max_write_attempts(mut self, attempts: usize) -> Self {
        self.config.max_write_attempts = attempts;
        self
    }

    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.config.close_timeout = timeout;
        self
    }

    pub fn build(self) -> SinkConfig {
        self.config
    }
}
