//! Synchronous handle onto a sink
//!
//! `SinkWriter` lets code that only knows `std::io::Write`, such as a
//! `tracing_subscriber` fmt layer, feed an [`AsyncLogSink`](super::AsyncLogSink).

use super::Shared;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Cloneable `io::Write` front end of an [`AsyncLogSink`](super::AsyncLogSink)
///
/// Every `write` call becomes one record. Writes after the sink is closed are
/// swallowed but still report the full length, so `write_all` callers do not
/// see `WriteZero`. `flush` is a no-op; flushing belongs to the sink.
#[derive(Clone)]
pub struct SinkWriter {
    shared: Arc<Shared>,
}

impl SinkWriter {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }
}

impl io::Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.shared.submit_blocking(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl std::fmt::Debug for SinkWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkWriter")
            .field("closed", &self.shared.cancel.is_cancelled())
            .finish()
    }
}
