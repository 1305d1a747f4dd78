// Integration tests for configuration loading and validation

use chrono::{NaiveDate, TimeZone, Utc};
use ma_cross_alert::{exchange_holidays, Config, ConfigError, GateStatus, MonitorError};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    for key in ["TICKER", "GITHUB_REPOSITORY", "GITHUB_TOKEN"] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_example_config_is_valid() {
    let config: Config = toml::from_str(include_str!("../config.toml.example"))
        .expect("Failed to parse example config");

    config.validate().expect("Example config should validate");
    assert_eq!(config.monitor.state_file, "state.txt");
    assert_eq!(config.schedule.sessions.len(), 2);
    assert!(config
        .schedule
        .holidays
        .contains(&NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
}

#[test]
fn test_example_holidays_match_built_in_calendar() {
    let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
    assert_eq!(config.schedule.holidays, exchange_holidays());
    assert_eq!(Config::default().schedule.holidays, exchange_holidays());
}

#[test]
fn test_partial_schedule_keeps_exchange_holidays() {
    let config: Config = toml::from_str("[schedule]\nutc_offset_hours = 9\n").unwrap();
    let gate = config.trading_gate().unwrap();

    // Monday 2027-01-11 10:00 JST, Coming of Age Day
    let holiday = Utc.with_ymd_and_hms(2027, 1, 11, 1, 0, 0).unwrap();
    assert_eq!(gate.check(holiday), GateStatus::NonTradingDay);
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config.monitor.symbol = Some("6758.T".to_string());
    config.monitor.min_samples = 100;
    config.to_file(&config_path).expect("Failed to write config");

    let loaded = Config::from_file(&config_path).expect("Failed to load config");
    assert_eq!(loaded.monitor.symbol.as_deref(), Some("6758.T"));
    assert_eq!(loaded.monitor.min_samples, 100);
    assert_eq!(loaded.schedule.utc_offset_hours, 9);
}

#[test]
fn test_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("partial.toml");
    fs::write(&config_path, "[monitor]\nstate_file = \"data/last_signal.txt\"\n")
        .expect("Failed to write partial config");

    let config = Config::from_file(&config_path).expect("Partial config should load");
    assert_eq!(config.monitor.state_file, "data/last_signal.txt");
    assert_eq!(config.monitor.long_window, 75);
    assert_eq!(config.notifier.api_url, "https://api.github.com");
}

#[test]
fn test_malformed_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("malformed.toml");
    fs::write(&config_path, "this is not valid toml {{{").expect("Failed to write config");

    let result = Config::from_file(&config_path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_windows_rejected_on_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[monitor]\nshort_window = 30\nmid_window = 25\n")
        .expect("Failed to write config");

    let result = Config::from_file(&config_path);
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn test_missing_file_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = Config::from_file(temp_dir.path().join("nope.toml"));

    let err: MonitorError = result.unwrap_err().into();
    assert!(matches!(err, MonitorError::ConfigNotFound(_)));
}

#[test]
#[serial]
fn test_load_without_file_reads_environment() {
    clear_env();
    std::env::set_var("TICKER", "7203.T");
    std::env::set_var("GITHUB_REPOSITORY", "me/alerts");
    std::env::set_var("GITHUB_TOKEN", "secret");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::load(temp_dir.path().join("absent.toml")).expect("Defaults should load");

    assert_eq!(config.symbol().unwrap(), "7203.T");
    assert_eq!(config.notifier.repository.as_deref(), Some("me/alerts"));
    assert_eq!(config.notifier.token.as_deref(), Some("secret"));
    clear_env();
}

#[test]
#[serial]
fn test_env_overrides_file_symbol() {
    clear_env();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[monitor]\nsymbol = \"6758.T\"\n").expect("Failed to write config");

    let from_file = Config::load(&config_path).unwrap();
    assert_eq!(from_file.symbol().unwrap(), "6758.T");

    std::env::set_var("TICKER", "9984.T");
    let overridden = Config::load(&config_path).unwrap();
    assert_eq!(overridden.symbol().unwrap(), "9984.T");
    clear_env();
}

#[test]
#[serial]
fn test_missing_ticker_is_configuration_error() {
    clear_env();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config::load(temp_dir.path().join("absent.toml")).unwrap();

    let err: MonitorError = config.symbol().unwrap_err().into();
    assert_eq!(err.category(), "config");
    assert_eq!(err.to_string(), "Missing required configuration: TICKER");
}

#[test]
fn test_gate_built_from_config() {
    let mut config = Config::default();
    config.schedule.holidays = vec![NaiveDate::from_ymd_opt(2026, 11, 3).unwrap()];
    let gate = config.trading_gate().expect("Gate should build");

    // Tuesday 2026-11-03 10:00 JST, a listed holiday
    let holiday = Utc.with_ymd_and_hms(2026, 11, 3, 1, 0, 0).unwrap();
    assert_eq!(gate.check(holiday), GateStatus::NonTradingDay);

    // Disabling the calendar falls back to time-of-day only
    config.schedule.check_trading_day = false;
    let gate = config.trading_gate().unwrap();
    assert_eq!(gate.check(holiday), GateStatus::Open);
}
