//! Logging Configuration and Initialization
//!
//! Sets up the global `tracing` subscriber for BDK binaries:
//!
//! - Console (stdout or stderr), file, or both
//! - Text or JSON lines
//! - Level plus extra `EnvFilter` directives
//!
//! File output never blocks the code that logs on disk I/O: formatted lines
//! are handed to an [`AsyncLogSink`] whose consumer runs on its own thread and
//! appends them to `<log_dir>/<log_file_prefix>.log`. Keep the returned
//! [`LogGuard`] and call [`LogGuard::shutdown`] before exiting so the queued
//! lines reach the file.
//!
//! # Example
//!
//! ```no_run
//! use bdk_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     let guard = init_logging(&config)?;
//!
//!     info!("Application started");
//!
//!     guard.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::sink::{AsyncLogSink, CloseReport, SinkConfig, SinkStats};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::fs::File;
use tokio::io::BufWriter;
use tracing::Level;
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Minimum level of events that are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where formatted events go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output
    #[default]
    Console,
    /// Standard error, leaving stdout to the program
    Stderr,
    /// The log file only
    File,
    /// Standard output and the log file
    Both,
}

impl LogOutput {
    fn uses_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }

    fn as_str(self) -> &'static str {
        match self {
            LogOutput::Console => "console",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
            LogOutput::Both => "both",
        }
    }
}

impl FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(anyhow!("Invalid log output: {}", s)),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line format of recorded events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: LogLevel,
    pub output: LogOutput,
    pub format: LogFormat,

    /// Directory of the log file, created on demand
    pub log_dir: PathBuf,

    /// Log file name without extension (`"bdk"` -> `bdk.log`)
    pub log_file_prefix: String,

    /// Extra `EnvFilter` directives, comma separated (e.g. `"tokio=warn"`)
    pub filter_directives: Option<String>,

    /// Add source file and line to every event
    pub include_location: bool,

    /// Queue and flush settings of the file sink
    #[serde(default)]
    pub sink: SinkConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            output: LogOutput::default(),
            format: LogFormat::default(),
            log_dir: PathBuf::from("./logs"),
            log_file_prefix: "bdk".to_string(),
            filter_directives: None,
            include_location: false,
            sink: SinkConfig::default(),
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults:
    /// - `LOG_LEVEL`: trace, debug, info, warn, error
    /// - `LOG_OUTPUT`: console, stderr, file, both
    /// - `LOG_FORMAT`: text, json
    /// - `LOG_DIR`, `LOG_FILE_PREFIX`: log file location
    /// - `LOG_FILTER`: extra filter directives
    /// - `LOG_INCLUDE_LOCATION`: true/false
    /// - `BDK_SINK_*`: file sink settings, see [`SinkConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(level) = env_parse("LOG_LEVEL")? {
            config.level = level;
        }
        if let Some(output) = env_parse("LOG_OUTPUT")? {
            config.output = output;
        }
        if let Some(format) = env_parse("LOG_FORMAT")? {
            config.format = format;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = std::env::var("LOG_FILE_PREFIX") {
            config.log_file_prefix = prefix;
        }
        if let Ok(filter) = std::env::var("LOG_FILTER") {
            config.filter_directives = Some(filter);
        }
        if let Some(include) = env_parse("LOG_INCLUDE_LOCATION")? {
            config.include_location = include;
        }

        config.sink = SinkConfig::from_env()?;
        Ok(config)
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }

    /// Path of the log file written when output includes file
    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.log_file_prefix))
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("{}: {}", key, e)),
        Err(_) => Ok(None),
    }
}

/// Builder for LogConfig
#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = dir.into();
        self
    }

    pub fn log_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.log_file_prefix = prefix.into();
        self
    }

    pub fn filter_directives(mut self, filter: impl Into<String>) -> Self {
        self.config.filter_directives = Some(filter.into());
        self
    }

    pub fn include_location(mut self, include: bool) -> Self {
        self.config.include_location = include;
        self
    }

    pub fn sink(mut self, sink: SinkConfig) -> Self {
        self.config.sink = sink;
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}

/// The file sink behind a file-backed subscriber
type FileSink = AsyncLogSink<BufWriter<File>>;

/// Keeps the file sink of the global subscriber alive
///
/// Console-only configurations hold no sink and shut down instantly.
#[must_use = "dropping the guard skips the final drain of the log file"]
pub struct LogGuard {
    sink: Option<FileSink>,
    sink_config: SinkConfig,
}

impl LogGuard {
    /// Counters of the file sink, if file output is enabled
    pub fn sink_stats(&self) -> Option<SinkStats> {
        self.sink.as_ref().map(|sink| sink.stats())
    }

    /// Drain queued lines to the log file and flush it
    pub async fn shutdown(self) -> crate::Result<CloseReport> {
        match self.sink {
            Some(sink) => sink.close(self.sink_config.close_timeout).await,
            None => Ok(CloseReport::Drained),
        }
    }
}

/// Initialize logging with the given configuration
///
/// This sets up the global tracing subscriber and fails if one is already
/// installed. Events may be emitted from async tasks on any runtime flavor
/// and from plain threads.
///
/// # Example
///
/// ```no_run
/// use bdk_common::logging::{LogConfig, init_logging};
///
/// # async fn run() -> anyhow::Result<()> {
/// let config = LogConfig::from_env()?;
/// let guard = init_logging(&config)?;
/// // ...
/// guard.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let mut filter =
        EnvFilter::from_default_env().add_directive(config.level.to_tracing_level().into());

    if let Some(ref directives) = config.filter_directives {
        for directive in directives.split(',') {
            filter = filter.add_directive(
                directive
                    .parse()
                    .context("Failed to parse filter directive")?,
            );
        }
    }

    let sink = if config.output.uses_file() {
        Some(open_file_sink(config)?)
    } else {
        None
    };

    let console_layer = match config.output {
        LogOutput::Console | LogOutput::Both => Some(fmt_layer(config, std::io::stdout, true)),
        LogOutput::Stderr => Some(fmt_layer(config, std::io::stderr, true)),
        LogOutput::File => None,
    };
    let file_layer = sink
        .as_ref()
        .map(|sink| fmt_layer(config, sink.writer(), false));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LogGuard {
        sink,
        sink_config: config.sink.clone(),
    })
}

/// A fmt layer in the configured format writing to `writer`
fn fmt_layer<S, W>(config: &LogConfig, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(ansi);

    match config.format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Open `<log_dir>/<prefix>.log` for appending behind a thread-backed sink
fn open_file_sink(config: &LogConfig) -> Result<FileSink> {
    std::fs::create_dir_all(&config.log_dir).context("Failed to create log directory")?;

    let path = config.log_file_path();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let writer = BufWriter::new(File::from_std(file));
    AsyncLogSink::open_on_thread(writer, &config.sink).context("Failed to open log sink")
}
