// Common types used across the application

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One closed bar of the intraday series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Time-ordered bars for one symbol at a fixed interval
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

/// A moving-average value aligned with the bar at the same index.
/// `value` is `None` until the window is full.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragePoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Short / mid / long window lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaWindows {
    pub short: usize,
    pub mid: usize,
    pub long: usize,
}

impl Default for MaWindows {
    fn default() -> Self {
        Self { short: 5, mid: 25, long: 75 }
    }
}

impl MaWindows {
    pub fn as_array(&self) -> [usize; 3] {
        [self.short, self.mid, self.long]
    }

    /// Pairs in detection order: short/mid, mid/long, short/long.
    /// This order is part of the persisted state format.
    pub fn pairs(&self) -> [MaPair; 3] {
        [
            MaPair::new(self.short, self.mid),
            MaPair::new(self.mid, self.long),
            MaPair::new(self.short, self.long),
        ]
    }
}

/// Two windows compared by the crossover detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaPair {
    pub short: usize,
    pub long: usize,
}

impl MaPair {
    pub fn new(short: usize, long: usize) -> Self {
        Self { short, long }
    }

    /// e.g. "5-25"
    pub fn label(&self) -> String {
        format!("{}-{}", self.short, self.long)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDirection {
    Golden, // short average rises above long
    Dead,   // short average falls below long
}

impl CrossDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossDirection::Golden => "golden cross",
            CrossDirection::Dead => "dead cross",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverEvent {
    pub pair: MaPair,
    pub direction: CrossDirection,
}

impl CrossoverEvent {
    /// Human-readable label, also the unit of the persisted state string
    pub fn label(&self) -> String {
        format!("{} ({})", self.direction.as_str(), self.pair.label())
    }
}

impl fmt::Display for CrossoverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Alert handed to the notifier; serializes to the issue request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_events(symbol: &str, events: &[CrossoverEvent]) -> Self {
        Self {
            title: format!("{} moving average cross detected", symbol),
            body: events
                .iter()
                .map(CrossoverEvent::label)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
