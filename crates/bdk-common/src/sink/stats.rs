//! Sink counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared between producers, the consumer task and the owner
#[derive(Debug, Default)]
pub(crate) struct Counters {
    accepted: AtomicU64,
    written: AtomicU64,
    abandoned: AtomicU64,
    write_errors: AtomicU64,
    flushes: AtomicU64,
}

impl Counters {
    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SinkStats {
        SinkStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a sink's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SinkStats {
    /// Records taken into the queue
    pub accepted: u64,
    /// Records fully handed to the underlying writer
    pub written: u64,
    /// Records whose remainder was dropped after a write error or exhausted retries
    pub abandoned: u64,
    /// Write calls that returned an error
    pub write_errors: u64,
    /// Flush calls issued on the underlying writer
    pub flushes: u64,
}

impl SinkStats {
    /// Records accepted but neither written nor abandoned yet
    pub fn pending(&self) -> u64 {
        self.accepted
            .saturating_sub(self.written)
            .saturating_sub(self.abandoned)
    }
}
