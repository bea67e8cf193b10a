//! Integration tests for configuration loading.

#![allow(clippy::unwrap_used, clippy::panic)]

use blackbelt::config::{ENV_API_URL, ENV_SUBMIT_TIMEOUT};
use blackbelt::{CliError, Config};
use std::io::Write;

#[test]
fn test_explicit_file_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "api_url = \"http://academy.local\"\nsubmit_timeout_secs = 4\nmaster_id = 12"
    )
    .unwrap();

    let config = Config::read(Some(file.path())).unwrap();

    assert_eq!(config.api_url, "http://academy.local");
    assert_eq!(config.submit_timeout_secs, 4);
    assert_eq!(config.master_id, Some(12));
    assert_eq!(config.api_token, None);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Config::read(Some(&path)).unwrap_err();

    assert!(matches!(err, CliError::Config { .. }));
}

#[test]
fn test_flag_wins_over_file_and_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"http://from-file\"").unwrap();

    let env = |key: &str| (key == ENV_API_URL).then(|| "http://from-env".to_string());
    let config = Config::resolve(Some(file.path()), Some("http://from-flag"), env).unwrap();
    assert_eq!(config.api_url, "http://from-flag");

    let config = Config::resolve(Some(file.path()), None, env).unwrap();
    assert_eq!(config.api_url, "http://from-env");
}

#[test]
fn test_zero_timeout_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "submit_timeout_secs = 0").unwrap();

    let err = Config::resolve(Some(file.path()), None, |_| None);
    assert!(matches!(err, Err(CliError::Input(_))));
}

#[test]
fn test_environment_can_repair_zero_timeout() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "submit_timeout_secs = 0").unwrap();

    let env = |key: &str| (key == ENV_SUBMIT_TIMEOUT).then(|| "9".to_string());
    let config = Config::resolve(Some(file.path()), None, env).unwrap();
    assert_eq!(config.submit_timeout_secs, 9);

    let env = |key: &str| (key == ENV_SUBMIT_TIMEOUT).then(|| "0".to_string());
    let err = Config::resolve(Some(file.path()), None, env);
    assert!(matches!(err, Err(CliError::Input(_))));
}
