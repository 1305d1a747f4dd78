// Configuration management for the crossover alert

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::schedule::{exchange_holidays, TradingCalendar, TradingGate, TradingSession};
use crate::types::MaWindows;

/// Environment variable holding the ticker symbol
pub const ENV_TICKER: &str = "TICKER";
/// Environment variable holding the `owner/repo` that receives alert issues
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// Environment variable holding the GitHub token
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Ticker symbol, e.g. "7203.T". `TICKER` overrides it.
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    #[serde(default = "default_mid_window")]
    pub mid_window: usize,
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub start: String, // "HH:MM"
    pub end: String,   // "HH:MM", inclusive
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Offset of the exchange's local time from UTC (Tokyo: +9, no DST)
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Also require a weekday that is not a listed holiday
    #[serde(default = "default_true")]
    pub check_trading_day: bool,
    /// Closed dates besides weekends; defaults to the built-in exchange calendar
    #[serde(default = "default_holidays")]
    pub holidays: Vec<NaiveDate>,
    #[serde(default = "default_sessions")]
    pub sessions: Vec<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_url")]
    pub base_url: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    /// `owner/repo`; `GITHUB_REPOSITORY` overrides it
    #[serde(default)]
    pub repository: Option<String>,
    /// Never written by `init`; normally supplied through `GITHUB_TOKEN`
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

// Default value functions
fn default_state_file() -> String { "state.txt".to_string() }
fn default_min_samples() -> usize { 80 }
fn default_short_window() -> usize { 5 }
fn default_mid_window() -> usize { 25 }
fn default_long_window() -> usize { 75 }
fn default_utc_offset_hours() -> i32 { 9 }
fn default_true() -> bool { true }
fn default_holidays() -> Vec<NaiveDate> { exchange_holidays() }
fn default_sessions() -> Vec<SessionConfig> {
    vec![
        SessionConfig { start: "09:00".to_string(), end: "11:30".to_string() },
        SessionConfig { start: "12:30".to_string(), end: "15:30".to_string() },
    ]
}
fn default_data_url() -> String { "https://query1.finance.yahoo.com".to_string() }
fn default_interval() -> String { "1m".to_string() }
fn default_range() -> String { "1d".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_github_api_url() -> String { "https://api.github.com".to_string() }

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            symbol: None,
            state_file: default_state_file(),
            min_samples: default_min_samples(),
            short_window: default_short_window(),
            mid_window: default_mid_window(),
            long_window: default_long_window(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            check_trading_day: true,
            holidays: default_holidays(),
            sessions: default_sessions(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: default_data_url(),
            interval: default_interval(),
            range: default_range(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            repository: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load the file if it exists, fall back to defaults otherwise, then
    /// apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(symbol) = get(ENV_TICKER) {
            self.monitor.symbol = Some(symbol);
        }
        if let Some(repo) = get(ENV_GITHUB_REPOSITORY) {
            self.notifier.repository = Some(repo);
        }
        if let Some(token) = get(ENV_GITHUB_TOKEN) {
            self.notifier.token = Some(token);
        }
    }

    /// The symbol to monitor; a run cannot start without one
    pub fn symbol(&self) -> Result<&str, ConfigError> {
        self.monitor
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::Missing(ENV_TICKER.to_string()))
    }

    pub fn windows(&self) -> MaWindows {
        MaWindows {
            short: self.monitor.short_window,
            mid: self.monitor.mid_window,
            long: self.monitor.long_window,
        }
    }

    /// Build the trading-window gate described by `[schedule]`
    pub fn trading_gate(&self) -> Result<TradingGate, ConfigError> {
        let sessions = self
            .schedule
            .sessions
            .iter()
            .map(|s| {
                let start = parse_clock(&s.start)?;
                let end = parse_clock(&s.end)?;
                Ok(TradingSession::new(start, end))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let calendar = self
            .schedule
            .check_trading_day
            .then(|| TradingCalendar::new(self.schedule.holidays.iter().copied()));

        TradingGate::new(self.schedule.utc_offset_hours, sessions, calendar)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "utc_offset_hours out of range: {}",
                    self.schedule.utc_offset_hours
                ))
            })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.monitor;

        if m.short_window == 0 {
            return Err(ConfigError::Validation("short_window must be greater than 0".to_string()));
        }

        if !(m.short_window < m.mid_window && m.mid_window < m.long_window) {
            return Err(ConfigError::Validation(
                "windows must satisfy short_window < mid_window < long_window".to_string(),
            ));
        }

        // The detector reads the last two points of the long average
        if m.min_samples <= m.long_window {
            return Err(ConfigError::Validation(format!(
                "min_samples ({}) must be greater than long_window ({})",
                m.min_samples, m.long_window
            )));
        }

        if m.state_file.trim().is_empty() {
            return Err(ConfigError::Validation("state_file must not be empty".to_string()));
        }

        if self.schedule.sessions.is_empty() {
            return Err(ConfigError::Validation("at least one session is required".to_string()));
        }

        for session in &self.schedule.sessions {
            let start = parse_clock(&session.start)?;
            let end = parse_clock(&session.end)?;
            if start > end {
                return Err(ConfigError::Validation(format!(
                    "session {}-{} ends before it starts",
                    session.start, session.end
                )));
            }
        }

        if !(-12..=14).contains(&self.schedule.utc_offset_hours) {
            return Err(ConfigError::Validation(format!(
                "utc_offset_hours out of range: {}",
                self.schedule.utc_offset_hours
            )));
        }

        if self.data.timeout_secs == 0 || self.notifier.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be greater than 0".to_string()));
        }

        Ok(())
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| ConfigError::Validation(format!("invalid time '{}': {}", value, e)))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Missing required configuration: {0}")]
    Missing(String),
}
