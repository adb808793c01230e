//! `bdk pipe` command implementation
//!
//! Reads stdin and submits every line, newline included, as one record to an
//! [`AsyncLogSink`] writing to the output. Bytes are passed through
//! unchanged, so non-UTF-8 input and a missing trailing newline survive.

use crate::error::{CliError, Result};
use crate::PipeArgs;
use bdk_common::sink::{AsyncLogSink, CloseReport, SinkConfig, SinkStats};
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader, BufWriter};
use tracing::{debug, info, warn};

/// What a pipe run did
#[derive(Debug, Clone, Serialize)]
pub struct PipeSummary {
    /// Lines read from the input
    pub lines: u64,
    /// Lines dropped because the close deadline expired
    pub pending: u64,
    /// Final sink counters
    pub stats: SinkStats,
}

/// Run `bdk pipe`
pub async fn run(args: &PipeArgs) -> Result<()> {
    let config = sink_config(args)?;

    let writer: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => {
            let file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            debug!(path = %path.display(), "Piping into file");
            Box::new(BufWriter::new(file))
        },
        None => Box::new(BufWriter::new(tokio::io::stdout())),
    };

    let summary = pipe(BufReader::new(tokio::io::stdin()), writer, &config).await?;

    if args.stats {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

/// Build the sink configuration from the environment and the flags
pub fn sink_config(args: &PipeArgs) -> Result<SinkConfig> {
    let mut config = SinkConfig::from_env()?;

    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(ms) = args.flush_interval_ms {
        config.flush_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = args.close_timeout_ms {
        config.close_timeout = Duration::from_millis(ms);
    }

    config
        .validate()
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    Ok(config)
}

/// Copy `reader` into `writer` line by line through a sink
pub async fn pipe<R, W>(mut reader: R, writer: W, config: &SinkConfig) -> Result<PipeSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let sink = AsyncLogSink::open_with_config(writer, config)?;

    let mut lines = 0u64;
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        sink.submit(&line).await;
        lines += 1;
    }

    let pending = match sink.close(config.close_timeout).await? {
        CloseReport::Drained => 0,
        CloseReport::DeadlineExceeded { pending } => {
            warn!(pending, "Output did not keep up; dropped lines");
            pending
        },
    };

    let stats = sink.stats();
    info!(lines, written = stats.written, "Pipe finished");

    Ok(PipeSummary {
        lines,
        pending,
        stats,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    async fn pipe_into_file(input: &'static [u8], config: &SinkConfig) -> (PipeSummary, Vec<u8>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let file = tokio::fs::File::create(&path).await.unwrap();

        let summary = pipe(input, BufWriter::new(file), config).await.unwrap();
        let written = tokio::fs::read(&path).await.unwrap();
        (summary, written)
    }

    #[tokio::test]
    async fn test_pipe_copies_all_lines() {
        let (summary, written) =
            pipe_into_file(b"alpha\nbeta\ngamma\n", &SinkConfig::default()).await;

        assert_eq!(written, b"alpha\nbeta\ngamma\n");
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.stats.written, 3);
    }

    #[tokio::test]
    async fn test_pipe_keeps_last_line_without_newline() {
        let (summary, written) = pipe_into_file(b"one\ntwo", &SinkConfig::default()).await;

        assert_eq!(written, b"one\ntwo");
        assert_eq!(summary.lines, 2);
    }

    #[tokio::test]
    async fn test_pipe_passes_non_utf8_bytes() {
        let (_, written) = pipe_into_file(b"\xff\xfe\n", &SinkConfig::default()).await;
        assert_eq!(written, b"\xff\xfe\n");
    }

    #[tokio::test]
    async fn test_pipe_with_small_queue() {
        let config = SinkConfig::builder().capacity(1).build();
        let input: &'static [u8] = b"1\n2\n3\n4\n5\n6\n7\n8\n";

        let (summary, written) = pipe_into_file(input, &config).await;

        assert_eq!(written, input);
        assert_eq!(summary.lines, 8);
    }

    #[test]
    fn test_sink_config_flags_override_defaults() {
        let args = PipeArgs {
            capacity: Some(7),
            flush_interval_ms: Some(20),
            close_timeout_ms: Some(300),
            ..Default::default()
        };

        let config = sink_config(&args).unwrap();
        assert_eq!(config.capacity, 7);
        assert_eq!(config.flush_interval, Duration::from_millis(20));
        assert_eq!(config.close_timeout, Duration::from_millis(300));
    }

    #[test]
    fn test_sink_config_rejects_zero_capacity() {
        let args = PipeArgs {
            capacity: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            sink_config(&args),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
