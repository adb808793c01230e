//! BDK CLI Library
//!
//! Command-line front end of the BDK toolkit.
//!
//! # Overview
//!
//! - **Piping**: stream stdin into a file through an async log sink (`bdk pipe`)
//! - **Random strings**: alphanumeric tokens (`bdk rand`)
//! - **Chunking**: split a list into fixed-size groups (`bdk chunk`)
//! - **Checks**: phone number and boolean string predicates (`bdk check`)

pub mod commands;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// BDK - small utilities around a buffered async log sink
#[derive(Parser, Debug)]
#[command(name = "bdk")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy stdin line by line into a file through an async sink
    Pipe(PipeArgs),

    /// Print random alphanumeric strings
    Rand {
        /// Length of each string
        #[arg(short, long, default_value = "16")]
        length: usize,

        /// Number of strings to print
        #[arg(short, long, default_value = "1")]
        count: usize,
    },

    /// Split values into chunks of a fixed size
    Chunk {
        /// Chunk size
        #[arg(short, long, default_value = "10")]
        size: usize,

        /// Print the chunks as a JSON array
        #[arg(long)]
        json: bool,

        /// Values to split
        values: Vec<String>,
    },

    /// Check a value against a predicate
    Check {
        /// Predicate to apply
        #[arg(value_enum)]
        kind: CheckKind,

        /// Value to check
        #[arg(default_value = "")]
        value: String,
    },
}

/// Options of `bdk pipe`
///
/// Unset sink options fall back to the `BDK_SINK_*` environment variables,
/// then to the built-in defaults.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PipeArgs {
    /// Output file, appended to (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Queue capacity in lines
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Flush interval while input keeps arriving, in milliseconds
    #[arg(long)]
    pub flush_interval_ms: Option<u64>,

    /// How long to wait for the queue to drain at the end, in milliseconds
    #[arg(long)]
    pub close_timeout_ms: Option<u64>,

    /// Print sink statistics as JSON to stderr when done
    #[arg(long)]
    pub stats: bool,
}

/// Predicates available to `bdk check`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// 11 digit mobile number
    Phone,
    /// Empty, or an 11 digit mobile number
    PhoneOrEmpty,
    /// Exactly "true" or "false"
    Bool,
}
