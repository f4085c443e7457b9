// ABOUTME: Behavioral tests for layered configuration loading

use std::fs;

use analysis_wizard::config::{AppConfig, SubmissionMode};
use analysis_wizard::wizard::FileSizePolicy;
use tempfile::TempDir;

#[test]
fn test_defaults_match_documented_values() {
    let config = AppConfig::default();

    assert!(!config.wizard.enforce_file_size_limit);
    assert_eq!(config.wizard.max_file_size_bytes, 5 * 1024 * 1024);
    assert!(config.wizard.allow_back_navigation);
    assert!(config.reveal.enabled);
    assert_eq!(config.reveal.initial_delay_ms, 300);
    assert_eq!(config.reveal.char_interval_ms, 30);
    assert_eq!(config.submission.mode, SubmissionMode::Simulated);
    assert_eq!(config.ui.tick_rate_ms, 50);
    assert_eq!(config.wizard.file_size_policy(), FileSizePolicy::Unlimited);
}

/// Later files override earlier ones key by key; untouched keys survive
#[test]
fn test_later_layers_override_earlier() {
    let dir = TempDir::new().unwrap();
    let user = dir.path().join("user.toml");
    let project = dir.path().join("project.toml");

    fs::write(
        &user,
        "[wizard]\nenforce_file_size_limit = true\nmax_file_size_bytes = 1024\n\n[reveal]\nchar_interval_ms = 5\n",
    )
    .unwrap();
    fs::write(&project, "[wizard]\nmax_file_size_bytes = 2048\n").unwrap();

    let config = AppConfig::load_from_paths(&[user, project]).unwrap();
    assert_eq!(config.wizard.file_size_policy(), FileSizePolicy::MaxBytes(2048));
    assert_eq!(config.reveal.char_interval_ms, 5);
    assert_eq!(config.reveal.initial_delay_ms, 300);
}

#[test]
fn test_missing_layers_are_skipped() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from_paths(&[dir.path().join("absent.toml")]).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_http_mode_requires_valid_endpoint() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    fs::write(&path, "[submission]\nmode = \"http\"\n").unwrap();
    assert!(AppConfig::load_from_paths(&[path.clone()]).is_err());

    fs::write(&path, "[submission]\nmode = \"http\"\nendpoint = \"ftp://example.com\"\n").unwrap();
    assert!(AppConfig::load_from_paths(&[path.clone()]).is_err());

    fs::write(
        &path,
        "[submission]\nmode = \"http\"\nendpoint = \"https://example.com/analyses\"\n",
    )
    .unwrap();
    let config = AppConfig::load_from_paths(&[path]).unwrap();
    assert_eq!(config.submission.mode, SubmissionMode::Http);
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
}
