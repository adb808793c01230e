//! BDK CLI - Main entry point

use bdk_cli::{Cli, Commands};
use bdk_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use clap::Parser;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Logs go to stderr so `pipe` output on stdout stays clean
    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Stderr)
        .log_file_prefix("bdk-cli")
        .build();

    // Environment overrides the flags only when it says something about logging
    let log_config = if std::env::var_os("LOG_LEVEL").is_some()
        || std::env::var_os("LOG_OUTPUT").is_some()
    {
        match LogConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: ignoring logging environment: {:#}", e);
                log_config
            },
        }
    } else {
        log_config
    };

    // CLI should work without logging
    let guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        },
    };

    let result = execute_command(&cli).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    if let Some(guard) = guard {
        if let Err(e) = guard.shutdown().await {
            eprintln!("Warning: failed to flush log file: {}", e);
        }
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> bdk_cli::Result<()> {
    match &cli.command {
        Commands::Pipe(args) => bdk_cli::commands::pipe::run(args).await,

        Commands::Rand { length, count } => bdk_cli::commands::rand::run(*length, *count),

        Commands::Chunk { size, json, values } => {
            bdk_cli::commands::chunk::run(*size, *json, values)
        },

        Commands::Check { kind, value } => bdk_cli::commands::check::run(*kind, value),
    }
}
