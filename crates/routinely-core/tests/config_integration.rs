//! Integration tests for config persistence.

use routinely_core::{Config, ConfigError};

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let cfg = Config::load_from(&path).unwrap();

    assert!(path.exists());
    assert_eq!(cfg.timer.tick_interval_ms, 1000);
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("tick_interval_ms = 1000"));
}

#[test]
fn set_then_save_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut cfg = Config::default();
    cfg.set("planner.default_duration", "1:30:00").unwrap();
    cfg.set("notifications.bell", "false").unwrap();
    cfg.save_to(&path).unwrap();

    let reloaded = Config::load_from(&path).unwrap();
    assert_eq!(reloaded.default_duration_secs(), Ok(5400));
    assert!(!reloaded.notifications.bell);
}

#[test]
fn malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[timer\ntick_interval_ms = ").unwrap();

    match Config::load_from(&path) {
        Err(ConfigError::LoadFailed { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected LoadFailed, got {other:?}"),
    }
}

#[test]
fn invalid_values_in_file_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[planner]\ndefault_start = \"breakfast\"\n").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::InvalidValue { .. })
    ));
}
