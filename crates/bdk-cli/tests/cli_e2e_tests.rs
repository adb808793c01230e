//! End-to-end tests for the bdk binary
//!
//! These tests validate:
//! - Piping stdin into a file and to stdout
//! - Sink statistics output
//! - Utility subcommands (rand, chunk, check)
//! - Exit codes on invalid input

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn bdk() -> Command {
    let mut cmd = Command::cargo_bin("bdk").unwrap();
    // Keep the environment from changing sink or log behavior under test
    for var in [
        "LOG_LEVEL",
        "LOG_OUTPUT",
        "RUST_LOG",
        "BDK_SINK_CAPACITY",
        "BDK_SINK_FLUSH_INTERVAL_MS",
        "BDK_SINK_MAX_WRITE_ATTEMPTS",
        "BDK_SINK_CLOSE_TIMEOUT_MS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Pipe Tests
// ============================================================================

#[test]
fn test_pipe_to_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("app.log");

    bdk()
        .arg("pipe")
        .arg("--output")
        .arg(&out)
        .write_stdin("first\nsecond\nthird\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&out).unwrap(), "first\nsecond\nthird\n");
}

#[test]
fn test_pipe_appends_to_existing_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("app.log");
    fs::write(&out, "old\n").unwrap();

    bdk()
        .args(["pipe", "--capacity", "1", "--output"])
        .arg(&out)
        .write_stdin("new\n")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "old\nnew\n");
}

#[test]
fn test_pipe_to_stdout() {
    bdk()
        .arg("pipe")
        .write_stdin("hello\nworld")
        .assert()
        .success()
        .stdout("hello\nworld");
}

#[test]
fn test_pipe_prints_stats() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("app.log");

    let output = bdk()
        .args(["pipe", "--stats", "--output"])
        .arg(&out)
        .write_stdin("a\nb\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(summary["lines"], 2);
    assert_eq!(summary["pending"], 0);
    assert_eq!(summary["stats"]["written"], 2);
}

#[test]
fn test_pipe_rejects_zero_capacity() {
    bdk()
        .args(["pipe", "--capacity", "0"])
        .write_stdin("x\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid argument"));
}

// ============================================================================
// Utility Command Tests
// ============================================================================

#[test]
fn test_rand_prints_requested_strings() {
    let output = bdk()
        .args(["rand", "--length", "8", "--count", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines
        .iter()
        .all(|l| l.len() == 8 && l.chars().all(|c| c.is_ascii_alphanumeric())));
}

#[test]
fn test_chunk_plain_output() {
    bdk()
        .args(["chunk", "--size", "2", "a", "b", "c", "d", "e"])
        .assert()
        .success()
        .stdout("a b\nc d\ne\n");
}

#[test]
fn test_chunk_json_output() {
    bdk()
        .args(["chunk", "--size", "3", "--json", "1", "2", "3", "4"])
        .assert()
        .success()
        .stdout("[[\"1\",\"2\",\"3\"],[\"4\"]]\n");
}

#[test]
fn test_check_valid_phone() {
    bdk()
        .args(["check", "phone", "13912345678"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn test_check_invalid_bool() {
    bdk()
        .args(["check", "bool", "yes"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_missing_subcommand_shows_help() {
    bdk()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_log_env_is_reported() {
    bdk()
        .env("LOG_LEVEL", "loud")
        .args(["chunk", "--size", "1", "x"])
        .assert()
        .success()
        .stdout("x\n")
        .stderr(predicate::str::contains("Warning: ignoring logging environment"))
        .stderr(predicate::str::contains("Invalid log level: loud"));
}
