//! BDK Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared building blocks for the BDK toolkit.
//!
//! # Overview
//!
//! - **Sink**: [`sink::AsyncLogSink`], a bounded, asynchronously drained byte
//!   sink with periodic and idle flushing and a graceful close
//! - **Logging**: tracing subscriber setup whose file output goes through a sink
//! - **Error Handling**: [`BdkError`] and the [`Result`] alias
//! - **Utilities**: slice chunking, random strings, string predicates
//!
//! # Example
//!
//! ```no_run
//! use bdk_common::sink::AsyncLogSink;
//! use std::time::Duration;
//!
//! # async fn run() -> bdk_common::Result<()> {
//! let file = tokio::fs::File::create("app.log").await?;
//! let sink = AsyncLogSink::open(tokio::io::BufWriter::new(file), 1000)?;
//!
//! sink.submit(b"hello\n").await;
//! sink.close(Duration::from_secs(5)).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod logging;
pub mod sink;
pub mod util;

// Re-export commonly used types
pub use error::{BdkError, Result};
pub use sink::{AsyncLogSink, CloseReport, SinkConfig, SinkStats, SinkWriter};
