use homeguard::config::Config;
use homeguard::log_mode::LogMode;
use homeguard::traffic::MonitorSettings;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_defaults_match_reference_behavior() {
    let config = Config::default();
    assert_eq!(config.tick_interval_ms, 2000);
    assert_eq!(config.alert_dismiss_ms, 6000);
    assert_eq!(config.buffer_capacity, 100);
    assert_eq!(config.report_batch_size, 15);
    assert_eq!(config.api_key_env, "API_KEY");
    assert_eq!(config.log_mode, LogMode::File);

    let settings = MonitorSettings::from(&config);
    assert_eq!(settings.tick_interval, Duration::from_secs(2));
    assert_eq!(settings.alert_dismiss, Duration::from_secs(6));
    assert_eq!(settings.capacity, 100);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "tick_interval_ms": 500, "log_mode": "SystemdJournal" }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.tick_interval_ms, 500);
    assert_eq!(config.log_mode, LogMode::SystemdJournal);
    assert_eq!(config.alert_dismiss_ms, 6000);
}

#[test]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("etc").join("homeguard").join("config.json");

    let mut config = Config::default();
    config.audible_alerts = false;
    config.api_bind = "0.0.0.0:9000".to_string();
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_blank_api_key_counts_as_missing() {
    let mut config = Config::default();
    config.api_key_env = "HOMEGUARD_TEST_BLANK_KEY".to_string();
    std::env::set_var("HOMEGUARD_TEST_BLANK_KEY", "   ");
    assert!(config.api_key().is_none());

    config.api_key_env = "HOMEGUARD_TEST_UNSET_KEY".to_string();
    assert!(config.api_key().is_none());
}
