//! Integration tests for the logging bootstrap

use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use tracing::Level;

#[test]
fn test_config_builder_round_trip() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(Level::DEBUG)
        .with_filter("core_versioner=trace")
        .with_target(false);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, Level::DEBUG);
    assert_eq!(config.filter.as_deref(), Some("core_versioner=trace"));
    assert!(!config.display_target);
}

#[test]
fn test_init_logging_succeeds_once_then_fails() {
    // The global subscriber can only be installed once per process, so both
    // assertions live in one test.
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))
        .expect("first initialization should succeed");

    tracing::info!("logging initialized inside integration test");

    let second = init_logging(LoggingConfig::default());
    assert!(second.is_err());
}
