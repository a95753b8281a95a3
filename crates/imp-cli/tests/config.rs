use std::fs;

use imp_cli::config::AppConfig;
use imp_cli::i18n::Language;
use imp_cli::settings::{Settings, load_settings_from, save_settings_to};

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "https://imports.example.com/api"

[templates]
dir = "/tmp/templates"

[general]
language = "de"
preview_rows = 10
"#,
    )
    .unwrap();

    let config = AppConfig::load(Some(&path)).unwrap();
    assert_eq!(config.api.base_url, "https://imports.example.com/api");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(
        config.templates.dir.as_deref(),
        Some(std::path::Path::new("/tmp/templates"))
    );
    assert_eq!(config.general.language.as_deref(), Some("de"));
    assert_eq!(config.general.preview_rows, 10);
}

#[test]
fn test_explicit_missing_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn test_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    assert_eq!(load_settings_from(&path), Settings::default());

    let settings = Settings {
        language: Language::Arabic.code().to_string(),
    };
    save_settings_to(&path, &settings).unwrap();
    let loaded = load_settings_from(&path);
    assert_eq!(loaded, settings);
    assert_eq!(loaded.language(), Language::Arabic);
    assert!(loaded.language().is_rtl());
}

#[test]
fn test_corrupt_settings_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "language = [").unwrap();
    assert_eq!(load_settings_from(&path).language(), Language::Turkish);
}
