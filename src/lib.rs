// Moving Average Crossover Alert Library
//
// Polls an intraday price series, detects golden/dead crosses between the
// 5/25/75-bar moving averages and raises one alert per distinct signal state

pub mod core;
pub mod clients;
pub mod config;
pub mod error;     // Unified error handling
pub mod monitor;
pub mod state;     // Persisted signal state
pub mod types;

// Re-export core types
pub use crate::core::{
    classify_cross, detect_crossovers, exchange_holidays, is_trading_time, simple_moving_average,
    Decision, Deduplicator, GateStatus, MovingAverages, SignalState, TradingCalendar, TradingGate,
    TradingSession, NO_STATE, STATE_SEPARATOR,
};

// Re-export error types
pub use error::{MonitorError, MonitorResult};

// Re-export client types
pub use clients::{GitHubIssueNotifier, LogNotifier, Notifier, SeriesFetcher, YahooChartClient};

// Re-export configuration
pub use config::{Config, ConfigError, DataConfig, MonitorConfig, NotifierConfig, ScheduleConfig};

pub use monitor::{Delivery, MonitorSettings, RunOutcome, SignalMonitor};
pub use state::{FileStateStore, MemoryStateStore, StateStore};
pub use types::{
    AveragePoint, CrossDirection, CrossoverEvent, MaPair, MaWindows, Notification, PriceBar,
    PriceSeries,
};
