//! Integration test for file logging through the sink
//!
//! Installs the global subscriber, so this binary holds a single test.

use bdk_common::logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
use bdk_common::sink::{CloseReport, SinkConfig};
use tracing::info;

#[tokio::test]
async fn test_file_output_reaches_disk_after_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig::builder()
        .level(LogLevel::Info)
        .output(LogOutput::File)
        .format(LogFormat::Json)
        .log_dir(dir.path())
        .log_file_prefix("integration")
        .sink(SinkConfig::builder().capacity(32).build())
        .build();

    let guard = init_logging(&config).unwrap();

    info!(request_id = 42, "first event");
    info!("second event");

    assert!(guard.sink_stats().is_some_and(|s| s.accepted >= 2));
    assert_eq!(guard.shutdown().await.unwrap(), CloseReport::Drained);

    let contents = std::fs::read_to_string(config.log_file_path()).unwrap();
    let events: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .filter(|event| event["fields"]["message"].is_string())
        .collect();
    let messages: Vec<&str> = events
        .iter()
        .filter_map(|event| event["fields"]["message"].as_str())
        .collect();

    let first = messages.iter().position(|m| *m == "first event").unwrap();
    let second = messages.iter().position(|m| *m == "second event").unwrap();
    assert!(first < second);
    assert_eq!(events[first]["fields"]["request_id"], 42);
}
