use super::*;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[test]
fn mask_keeps_suffix_only() {
    assert_eq!(mask("sk-abcdefgh1234"), "****1234");
    assert_eq!(mask("abcd"), "****");
    assert_eq!(mask(""), "****");
}

#[test]
#[serial]
fn explicit_env_file_is_loaded() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let env_path = temp_dir.path().join("test.env");
    fs::write(
        &env_path,
        "FAQ_SEARCH_CONFIG_TEST_VALUE=loaded-from-file\n",
    )
    .expect("should write env file");

    let loaded = load_env_file(Some(&env_path)).expect("env file should load");
    assert_eq!(loaded.as_deref(), Some(env_path.as_path()));
    assert_eq!(
        std::env::var("FAQ_SEARCH_CONFIG_TEST_VALUE").ok().as_deref(),
        Some("loaded-from-file")
    );
}

#[test]
#[serial]
fn missing_explicit_env_file_is_an_error() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let missing = temp_dir.path().join("does-not-exist.env");

    let err = load_env_file(Some(&missing)).expect_err("missing file should fail");
    assert!(matches!(err, ConfigError::EnvFile(_)));
}

#[test]
fn error_display_messages() {
    let errors = vec![
        ConfigError::Missing("API_URL"),
        ConfigError::InvalidPort("0".to_string()),
        ConfigError::InvalidModel(String::new()),
        ConfigError::InvalidEmbeddingDimension("0".to_string()),
        ConfigError::InvalidTableName("a-b".to_string()),
        ConfigError::InvalidUrl("API_URL", "relative URL without a base".to_string()),
    ];

    for error in errors {
        let message = format!("{error}");
        assert!(message.len() > 10, "message too short: {}", message);
    }
}
