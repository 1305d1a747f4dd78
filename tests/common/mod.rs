// Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;

use ma_cross_alert::{
    MonitorError, MonitorResult, MonitorSettings, Notification, Notifier, PriceBar, PriceSeries,
    SeriesFetcher,
};

pub const SYMBOL: &str = "7203.T";

/// Monday 2026-10-19 10:00 JST
pub fn market_open() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 1, 0, 0).unwrap()
}

/// Monday 2026-10-19 12:00 JST (lunch recess)
pub fn lunch_break() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap()
}

pub fn settings() -> MonitorSettings {
    MonitorSettings::new(SYMBOL)
}

/// One-minute bars starting at the morning open
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            timestamp: start + Duration::minutes(i as i64),
            close,
        })
        .collect();
    PriceSeries::new(SYMBOL, "1m", bars)
}

/// 80 bars: flat, a higher plateau, a dip, then a jump on the last bar.
/// Only MA5 crosses MA25 (upwards) between the last two samples.
pub fn golden_5_25_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 55];
    closes.extend(vec![102.0; 23]);
    closes.push(95.0);
    closes.push(120.0);
    closes
}

/// 80 bars rising steadily, then a crash: all three pairs cross down
pub fn dead_all_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..79).map(|i| 1000.0 + i as f64).collect();
    closes.push(50.0);
    closes
}

/// Returns a fixed series and counts calls
pub struct StaticFetcher {
    series: PriceSeries,
    calls: Mutex<usize>,
}

impl StaticFetcher {
    pub fn new(series: PriceSeries) -> Self {
        Self {
            series,
            calls: Mutex::new(0),
        }
    }

    pub fn from_closes(closes: &[f64]) -> Self {
        Self::new(series_from_closes(closes))
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SeriesFetcher for StaticFetcher {
    async fn fetch(&self, _symbol: &str) -> MonitorResult<PriceSeries> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.series.clone())
    }
}

/// Always fails, like an unreachable data source
pub struct FailingFetcher;

#[async_trait]
impl SeriesFetcher for FailingFetcher {
    async fn fetch(&self, _symbol: &str) -> MonitorResult<PriceSeries> {
        Err(MonitorError::ApiConnection("connection refused".to_string()))
    }
}

#[derive(Debug, Clone)]
pub enum NotifierBehaviour {
    Status(u16),
    TransportError,
    MissingCredentials,
}

/// Records every notification it is asked to send
pub struct RecordingNotifier {
    behaviour: NotifierBehaviour,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new(behaviour: NotifierBehaviour) -> Self {
        Self {
            behaviour,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn ok() -> Self {
        Self::new(NotifierBehaviour::Status(201))
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> MonitorResult<u16> {
        self.sent.lock().unwrap().push(notification.clone());
        match &self.behaviour {
            NotifierBehaviour::Status(status) => Ok(*status),
            NotifierBehaviour::TransportError => {
                Err(MonitorError::ApiTimeout("operation timed out".to_string()))
            }
            NotifierBehaviour::MissingCredentials => {
                Err(MonitorError::ConfigMissing("GITHUB_TOKEN".to_string()))
            }
        }
    }
}
