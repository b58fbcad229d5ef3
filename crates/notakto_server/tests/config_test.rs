//! Tests for loading server configuration from disk.

use notakto_server::ServerConfig;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "host = \"0.0.0.0\"\nport = 9000\nskip_cost = 150\nlog_filter = \"debug\""
    )
    .unwrap();

    let config = ServerConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 9000);
    assert_eq!(*config.skip_cost(), 150);
    assert_eq!(config.log_filter(), "debug");
}

#[test]
fn test_no_file_means_defaults() {
    let config = ServerConfig::load(None).unwrap();
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ServerConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number\"").unwrap();
    let err = ServerConfig::load(Some(file.path())).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_flags_override_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "port = 9000").unwrap();
    let config = ServerConfig::load(Some(file.path()))
        .unwrap()
        .with_overrides(Some("localhost".to_string()), None);
    assert_eq!(config.host(), "localhost");
    assert_eq!(*config.port(), 9000);
}
