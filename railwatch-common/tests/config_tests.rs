//! Integration tests for TOML config loading

use railwatch_common::config::{load_config, load_toml_config, LoggingConfig, TomlConfig};
use railwatch_common::Error;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_parses() {
    let file = write_config(
        r#"
service_url = "http://detector.local:8000"
default_threshold = 0.5
upload_timeout_secs = 120

[logging]
level = "debug"
"#,
    );

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(
        config,
        TomlConfig {
            service_url: Some("http://detector.local:8000".to_string()),
            default_threshold: Some(0.5),
            upload_timeout_secs: Some(120),
            logging: LoggingConfig {
                level: Some("debug".to_string()),
            },
        }
    );
}

#[test]
fn test_empty_config_is_all_defaults() {
    let file = write_config("");
    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_config_is_parse_error() {
    let file = write_config("service_url = [unterminated");
    let err = load_toml_config(file.path()).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn test_wrong_type_is_parse_error() {
    let file = write_config("upload_timeout_secs = \"soon\"");
    assert!(load_toml_config(file.path()).is_err());
}

#[test]
fn test_explicit_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = load_config(Some(&missing)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_explicit_file_used() {
    let file = write_config("default_threshold = 0.3");
    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.default_threshold, Some(0.3));
}
