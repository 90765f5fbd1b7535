//! Integration tests for configuration management

use seo_analyzer::config::{Config, ConfigOverrides, SessionMode};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.api.base_url.is_empty(),
        "Default API root should not be empty"
    );
    assert!(
        !config.paths.exports_dir.is_empty(),
        "Default exports_dir should not be empty"
    );
    assert!(config.auth.provider_key.is_empty());
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[api]
base_url = "https://api.example.com"
timeout_secs = 5

[auth]
provider_key = "pk_live_abc"
user_id = "user_42"
email = "jane@example.com"

[billing]
app_origin = "https://app.example.com"

[paths]
exports_dir = "./exports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.api.base_url, "https://api.example.com");
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.auth.user_id, "user_42");
    assert_eq!(config.billing.app_origin, "https://app.example.com");
    assert_eq!(config.paths.exports_dir, "./exports");
    assert_eq!(config.session_mode(), SessionMode::Provider);
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.auth.provider_key, "");
    assert_eq!(config.session_mode(), SessionMode::Demo);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$SEO_ANALYZER/test.log"

[paths]
exports_dir = "$SEO_ANALYZER/exports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("seoanalyzer"));
    assert!(!config.logging.file.contains("$SEO_ANALYZER"));
    assert!(config.paths.exports_dir.ends_with("exports"));
    assert!(!config.paths.exports_dir.contains("$SEO_ANALYZER"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config
        .set("timeout-secs", "12")
        .expect("Failed to set timeout");
    assert_eq!(config.api.timeout_secs, 12);
    assert!(config.set("timeout_secs", "soon").is_err());

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config
        .set("base_url", "http://elsewhere:9000")
        .expect("Failed to set base_url");
    config
        .unset("base_url", &defaults)
        .expect("Failed to unset base_url");
    assert_eq!(config.api.base_url, defaults.api.base_url);
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("user_id", "user_7").expect("Failed to set user");
    config.save_to(&config_file).expect("Failed to save config");

    let loaded = Config::load_from(&config_file);
    assert_eq!(loaded.logging.level, "info");
    assert_eq!(loaded.auth.user_id, "user_7");
}

#[test]
fn test_load_creates_missing_file() {
    let (_temp_dir, config_file) = setup_temp_config();
    assert!(!config_file.exists());

    let config = Config::load_from(&config_file);
    assert!(config_file.exists());
    assert_eq!(config.api.base_url, Config::from_defaults().api.base_url);
}

#[test]
fn test_load_merges_missing_fields() {
    let (_temp_dir, config_file) = setup_temp_config();
    fs::write(&config_file, "[logging]\nlevel = \"error\"\n").expect("Failed to write config");

    let config = Config::load_from(&config_file);
    assert_eq!(config.logging.level, "error");
    assert!(!config.api.base_url.is_empty());

    let rewritten = fs::read_to_string(&config_file).expect("Failed to read config");
    assert!(rewritten.contains("base_url"));
}

#[test]
fn test_malformed_file_falls_back_without_overwrite() {
    let (_temp_dir, config_file) = setup_temp_config();
    fs::write(&config_file, "this is = = not toml").expect("Failed to write config");

    let config = Config::load_from(&config_file);
    assert_eq!(config.api.base_url, Config::from_defaults().api.base_url);
    assert_eq!(
        fs::read_to_string(&config_file).unwrap(),
        "this is = = not toml"
    );
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        api_url: Some("http://127.0.0.1:9999".to_string()),
        provider_key: Some("pk_test".to_string()),
        exports_dir: Some("./custom_exports".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.api.base_url, "http://127.0.0.1:9999");
    assert_eq!(config.session_mode(), SessionMode::Provider);
    assert_eq!(config.paths.exports_dir, "./custom_exports");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let original_url = config.api.base_url.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };
    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.api.base_url, original_url);
}

#[test]
fn test_empty_provider_key_override_forces_demo() {
    let mut config = Config::from_defaults();
    config.set("provider_key", "pk_live").unwrap();
    assert_eq!(config.session_mode(), SessionMode::Provider);

    config.apply_overrides(&ConfigOverrides {
        provider_key: Some(String::new()),
        ..ConfigOverrides::default()
    });
    assert_eq!(config.session_mode(), SessionMode::Demo);
}

#[test]
fn test_display_masks_provider_key() {
    let mut config = Config::from_defaults();
    config.set("provider_key", "pk_secret_value").unwrap();
    let shown = config.to_string();
    assert!(shown.contains("<set>"));
    assert!(!shown.contains("pk_secret_value"));
}
