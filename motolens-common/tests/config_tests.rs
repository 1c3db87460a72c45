//! Tests for TOML configuration loading

use motolens_common::config::{config_file_path, load_toml_config, load_toml_config_from, TomlConfig};
use motolens_common::Error;
use serial_test::serial;
use std::io::Write;

#[test]
fn defaults_are_complete() {
    let config = TomlConfig::default();
    assert!(config.catalog_api_key.is_none());
    assert_eq!(config.catalog.timeout_seconds, 45);
    assert_eq!(config.catalog.lang_id, 4);
    assert_eq!(config.catalog.country_filter_id, 62);
    assert_eq!(config.catalog.type_id, 1);
    assert_eq!(config.catalog.search_param, "*");
    assert_eq!(config.server.port, 5810);
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "catalog_api_key = \"abc123\"\n\n[catalog]\nlang_id = 6").unwrap();

    let config = load_toml_config_from(file.path()).unwrap();
    assert_eq!(config.catalog_api_key.as_deref(), Some("abc123"));
    assert_eq!(config.catalog.lang_id, 6);
    assert_eq!(config.catalog.country_filter_id, 62);
    assert_eq!(config.server.port, 5810);
}

#[test]
fn full_file_round_trips() {
    let config = TomlConfig {
        catalog_api_key: Some("secret".to_string()),
        ..TomlConfig::default()
    };
    let serialized = toml::to_string(&config).unwrap();
    let parsed: TomlConfig = toml::from_str(&serialized).unwrap();
    assert_eq!(parsed.catalog_api_key.as_deref(), Some("secret"));
    assert_eq!(parsed.catalog.base_url, config.catalog.base_url);
}

#[test]
fn malformed_explicit_file_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "catalog = not toml at all [").unwrap();
    assert!(matches!(
        load_toml_config_from(file.path()),
        Err(Error::Config(_))
    ));
}

#[test]
fn missing_explicit_file_is_an_io_error() {
    let path = std::path::Path::new("/nonexistent/motolens-vp.toml");
    assert!(matches!(load_toml_config_from(path), Err(Error::Io(_))));
}

#[test]
#[serial]
fn default_path_is_under_motolens_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let path = config_file_path("motolens-vp").unwrap();
    std::env::remove_var("XDG_CONFIG_HOME");

    assert!(path.ends_with("motolens/motolens-vp.toml"));
}

#[test]
#[serial]
fn missing_default_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let config = load_toml_config("motolens-vp");
    std::env::remove_var("XDG_CONFIG_HOME");

    assert_eq!(config.server.port, 5810);
    assert_eq!(config.catalog.timeout_seconds, 45);
}
