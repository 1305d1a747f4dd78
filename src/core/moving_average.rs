// Simple moving averages over the closing prices

use std::collections::BTreeMap;

use crate::error::{MonitorError, MonitorResult};
use crate::types::{AveragePoint, MaWindows, PriceSeries};

/// Rolling arithmetic mean aligned with `prices`.
///
/// Position `i` is `None` while `i < window - 1` and the mean of
/// `prices[i + 1 - window ..= i]` afterwards. A zero window, or one longer
/// than the input, yields only `None`.
pub fn simple_moving_average(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; prices.len()];
    }

    (0..prices.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let slice = &prices[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Abort unless the series holds at least `required` bars
pub fn ensure_sufficient(available: usize, required: usize) -> MonitorResult<()> {
    if available < required {
        return Err(MonitorError::InsufficientData { required, available });
    }
    Ok(())
}

/// The short, mid and long averages of one series
#[derive(Debug, Clone)]
pub struct MovingAverages {
    windows: MaWindows,
    series: BTreeMap<usize, Vec<AveragePoint>>,
}

impl MovingAverages {
    /// Compute all three averages after checking the sample threshold
    pub fn compute(
        prices: &PriceSeries,
        windows: MaWindows,
        min_samples: usize,
    ) -> MonitorResult<Self> {
        ensure_sufficient(prices.len(), min_samples)?;

        let closes = prices.closes();
        let series = windows
            .as_array()
            .into_iter()
            .map(|window| {
                let points: Vec<AveragePoint> = simple_moving_average(&closes, window)
                    .into_iter()
                    .zip(&prices.bars)
                    .map(|(value, bar)| AveragePoint {
                        timestamp: bar.timestamp,
                        value,
                    })
                    .collect();
                (window, points)
            })
            .collect();

        Ok(Self { windows, series })
    }

    pub fn windows(&self) -> MaWindows {
        self.windows
    }

    pub fn series(&self, window: usize) -> Option<&[AveragePoint]> {
        self.series.get(&window).map(Vec::as_slice)
    }

    /// Most recent defined value for `window`
    pub fn latest(&self, window: usize) -> Option<f64> {
        self.series(window)?.last()?.value
    }
}
