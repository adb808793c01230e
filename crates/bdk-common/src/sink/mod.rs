//! Asynchronous Log Sink
//!
//! [`AsyncLogSink`] puts a bounded queue and one background task between any
//! number of producers and a sequential writer (typically a
//! `tokio::io::BufWriter<tokio::fs::File>`):
//!
//! - `submit` copies the bytes into the queue and never performs I/O. It
//!   waits only while the queue is full.
//! - The background task writes records in FIFO order, flushing when the
//!   queue runs dry and otherwise once per flush interval.
//! - `close` stops accepting records, waits for the queue to drain up to a
//!   deadline, and flushes the writer one last time.
//!
//! Writer failures never reach producers. Short writes are retried a bounded
//! number of times per record; a record that still is not fully written after
//! that is dropped and counted in [`SinkStats::abandoned`]. A slow writer and
//! a stalled one are not told apart.
//!
//! # Example
//!
//! ```no_run
//! use bdk_common::sink::{AsyncLogSink, CloseReport};
//! use std::time::Duration;
//!
//! # async fn run() -> bdk_common::Result<()> {
//! let sink = AsyncLogSink::open(tokio::io::stdout(), 1000)?;
//! sink.submit(b"first line\n").await;
//!
//! if let CloseReport::DeadlineExceeded { pending } = sink.close(Duration::from_secs(1)).await? {
//!     eprintln!("{} records were not written", pending);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod consumer;
mod stats;
mod writer;

pub use config::{
    SinkConfig, SinkConfigBuilder, DEFAULT_CAPACITY, DEFAULT_CLOSE_TIMEOUT,
    DEFAULT_FLUSH_INTERVAL, DEFAULT_MAX_WRITE_ATTEMPTS,
};
pub use stats::SinkStats;
pub use writer::SinkWriter;

use crate::error::{BdkError, Result};
use consumer::Consumer;
use futures::future::BoxFuture;
use futures::FutureExt;
use stats::Counters;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// One queued payload, owned by the sink from the moment it is accepted
pub(crate) type Record = Vec<u8>;

/// Name of the OS thread started by [`AsyncLogSink::open_on_thread`]
const SINK_THREAD_NAME: &str = "bdk-log-sink";

/// Outcome of [`AsyncLogSink::close`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReport {
    /// Every accepted record was handed to the writer
    Drained,
    /// The deadline expired first; the consumer was stopped and `pending`
    /// records were dropped
    DeadlineExceeded { pending: u64 },
}

/// Producer-side state, shared with every [`SinkWriter`] handle
pub(crate) struct Shared {
    tx: mpsc::Sender<Record>,
    cancel: CancellationToken,
    counters: Arc<Counters>,
}

impl Shared {
    async fn submit(&self, data: &[u8]) -> usize {
        if self.cancel.is_cancelled() {
            return 0;
        }

        let permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return 0,
            permit = self.tx.reserve() => match permit {
                Ok(permit) => permit,
                Err(_) => return 0,
            },
        };

        self.counters.record_accepted();
        permit.send(data.to_vec());
        data.len()
    }

    pub(crate) fn submit_blocking(&self, data: &[u8]) -> usize {
        if self.cancel.is_cancelled() {
            return 0;
        }

        match self.tx.try_reserve() {
            Ok(permit) => {
                self.counters.record_accepted();
                permit.send(data.to_vec());
                data.len()
            },
            Err(mpsc::error::TrySendError::Full(())) => {
                let wait = || futures::executor::block_on(self.submit(data));
                match Handle::try_current() {
                    // A parked worker would strand the consumer sitting in its
                    // local queue; hand that queue to another thread first.
                    Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                        tokio::task::block_in_place(wait)
                    },
                    _ => wait(),
                }
            },
            Err(mpsc::error::TrySendError::Closed(())) => 0,
        }
    }
}

/// Bounded, asynchronously drained byte sink
///
/// Dropping the sink without calling [`close`](Self::close) lets the
/// background task drain what is queued and exit once every [`SinkWriter`]
/// handle is gone, but nothing waits for it and no final flush is issued.
pub struct AsyncLogSink<W> {
    shared: Arc<Shared>,
    writer: Arc<Mutex<W>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
    /// Cancelled once the background task has returned or been aborted
    finished: CancellationToken,
}

impl<W> AsyncLogSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Open a sink with the given queue capacity and default timings
    ///
    /// Spawns the background task on the current tokio runtime; panics like
    /// `tokio::spawn` when called outside one.
    pub fn open(writer: W, capacity: usize) -> Result<Self> {
        let config = SinkConfig::builder().capacity(capacity).build();
        Self::open_with_config(writer, &config)
    }

    /// Open a sink with a full configuration
    pub fn open_with_config(writer: W, config: &SinkConfig) -> Result<Self> {
        Self::start(writer, config, |task, _| Ok(tokio::spawn(task)))
    }

    /// Open a sink whose background task runs on its own OS thread
    ///
    /// The thread drives a single-threaded runtime that only runs the
    /// consumer, so producers blocked in [`submit_blocking`](Self::submit_blocking)
    /// or a [`SinkWriter`] never hold it up, whatever runtime they are on.
    /// Needs no ambient tokio runtime. The thread exits when the consumer does.
    pub fn open_on_thread(writer: W, config: &SinkConfig) -> Result<Self> {
        Self::start(writer, config, |task, finished| {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let handle = runtime.spawn(task);

            std::thread::Builder::new()
                .name(SINK_THREAD_NAME.to_string())
                .spawn(move || runtime.block_on(finished.cancelled()))?;

            Ok(handle)
        })
    }

    fn start<F>(writer: W, config: &SinkConfig, spawn: F) -> Result<Self>
    where
        F: FnOnce(BoxFuture<'static, ()>, CancellationToken) -> Result<JoinHandle<()>>,
    {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.capacity);
        let cancel = CancellationToken::new();
        let finished = CancellationToken::new();
        let counters = Arc::new(Counters::default());
        let writer = Arc::new(Mutex::new(writer));

        let consumer = Consumer {
            rx,
            writer: Arc::clone(&writer),
            cancel: cancel.clone(),
            counters: Arc::clone(&counters),
            flush_interval: config.flush_interval,
            max_write_attempts: config.max_write_attempts,
        };
        // Dropped with the task, whether it returns or is aborted.
        let done = finished.clone().drop_guard();
        let task = async move {
            let _done = done;
            consumer.run().await;
        }
        .boxed();
        let handle = spawn(task, finished.clone())?;

        debug!(
            capacity = config.capacity,
            flush_interval_ms = config.flush_interval.as_millis() as u64,
            "Log sink opened"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                tx,
                cancel,
                counters,
            }),
            writer,
            consumer: Mutex::new(Some(handle)),
            finished,
        })
    }

    /// Queue a copy of `data`, waiting while the queue is full
    ///
    /// Returns the number of bytes accepted: `data.len()` while the sink is
    /// open, 0 once it has been closed (including for a call that was
    /// waiting for room when `close` began).
    pub async fn submit(&self, data: &[u8]) -> usize {
        self.shared.submit(data).await
    }

    /// Like [`submit`](Self::submit), for synchronous callers
    ///
    /// When the queue is full the calling thread is parked until room frees
    /// up. On a multi-thread runtime the worker's queued tasks are handed off
    /// first. On a current-thread runtime the parked thread may be the one
    /// the consumer needs; sinks fed this way from such a runtime should be
    /// opened with [`open_on_thread`](Self::open_on_thread).
    pub fn submit_blocking(&self, data: &[u8]) -> usize {
        self.shared.submit_blocking(data)
    }

    /// A cloneable `std::io::Write` handle feeding this sink
    pub fn writer(&self) -> SinkWriter {
        SinkWriter::new(Arc::clone(&self.shared))
    }

    /// Flush the underlying writer now
    pub async fn sync(&self) -> Result<()> {
        self.flush_writer().await
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Current counters
    pub fn stats(&self) -> SinkStats {
        self.shared.counters.snapshot()
    }

    /// Stop accepting records, drain the queue and flush
    ///
    /// Waits at most `deadline` for the background task to write what is
    /// queued. If it has not finished by then it is aborted and the records
    /// it had not written are reported in [`CloseReport::DeadlineExceeded`].
    /// Either way one final flush is attempted within what is left of
    /// `deadline`; its error is the only one returned, and a flush that
    /// cannot complete in time fails with [`io::ErrorKind::TimedOut`].
    ///
    /// Concurrent and repeated calls all wait for the same drain, each bounded
    /// by its own deadline, and report the records still pending when they
    /// stop waiting.
    pub async fn close(&self, deadline: Duration) -> Result<CloseReport> {
        let started = Instant::now();
        self.shared.cancel.cancel();

        let handle = self.consumer.lock().await.take();
        let report = match handle {
            Some(mut handle) => match timeout(deadline, &mut handle).await {
                Ok(Ok(())) => CloseReport::Drained,
                Ok(Err(e)) => {
                    error!(error = %e, "Log sink consumer failed");
                    self.report_pending()
                },
                Err(_) => {
                    handle.abort();
                    let _ = handle.await;
                    self.report_pending()
                },
            },
            None => {
                let _ = timeout(deadline, self.finished.cancelled()).await;
                self.report_pending()
            },
        };

        let remaining = deadline.saturating_sub(started.elapsed());
        let flushed = match timeout(remaining, self.flush_writer()).await {
            Ok(flushed) => flushed,
            Err(_) => Err(BdkError::Flush(io::Error::new(
                io::ErrorKind::TimedOut,
                "writer still busy at the close deadline",
            ))),
        };

        match report {
            CloseReport::Drained => debug!(stats = ?self.stats(), "Log sink closed"),
            CloseReport::DeadlineExceeded { pending } => warn!(
                pending,
                deadline_ms = deadline.as_millis() as u64,
                "Log sink closed before its queue was drained"
            ),
        }

        flushed.map(|()| report)
    }

    fn report_pending(&self) -> CloseReport {
        match self.stats().pending() {
            0 => CloseReport::Drained,
            pending => CloseReport::DeadlineExceeded { pending },
        }
    }

    async fn flush_writer(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        self.shared.counters.record_flush();
        writer.flush().await.map_err(BdkError::Flush)
    }
}
