//! Background drain task
//!
//! The consumer is the only code that writes to the underlying writer. It
//! flushes as soon as the queue runs dry and otherwise at most once per flush
//! interval, so bursts are written with few flushes and a lone record still
//! reaches the writer without waiting for the timer.
//!
//! No tracing events are emitted from here: the sink is commonly the writer
//! of the very subscriber those events would go to.

use super::stats::Counters;
use super::Record;
use futures::FutureExt;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub(crate) struct Consumer<W> {
    pub(crate) rx: mpsc::Receiver<Record>,
    pub(crate) writer: Arc<Mutex<W>>,
    pub(crate) cancel: CancellationToken,
    pub(crate) counters: Arc<Counters>,
    pub(crate) flush_interval: Duration,
    pub(crate) max_write_attempts: usize,
}

impl<W> Consumer<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Drain the queue until it is closed and empty
    pub(crate) async fn run(mut self) {
        let mut ticker = interval_at(Instant::now() + self.flush_interval, self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut closing = false;

        loop {
            let record = tokio::select! {
                biased;
                _ = self.cancel.cancelled(), if !closing => {
                    // Refuse new entries; whatever is buffered is still received.
                    closing = true;
                    self.rx.close();
                    continue;
                }
                record = self.rx.recv() => record,
            };

            let Some(record) = record else {
                break;
            };

            let mut writer = self.writer.lock().await;
            write_record(&mut *writer, &record, self.max_write_attempts, &self.counters).await;

            let flush_due = self.rx.is_empty() || ticker.tick().now_or_never().is_some();
            if flush_due {
                self.counters.record_flush();
                let _ = writer.flush().await;
            }
        }
    }
}

/// Write one record, retrying short writes up to `max_attempts` calls
async fn write_record<W>(writer: &mut W, record: &[u8], max_attempts: usize, counters: &Counters)
where
    W: AsyncWrite + Unpin,
{
    let mut offset = 0;
    let mut attempts = 0;

    while offset < record.len() {
        if attempts == max_attempts {
            counters.record_abandoned();
            return;
        }
        attempts += 1;

        match writer.write(&record[offset..]).await {
            Ok(n) => offset += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => {
                counters.record_write_error();
                counters.record_abandoned();
                return;
            },
        }
    }

    counters.record_written();
}
