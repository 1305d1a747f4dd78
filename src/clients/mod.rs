// External API clients

use async_trait::async_trait;

use crate::error::MonitorResult;
use crate::types::{Notification, PriceSeries};

pub mod yahoo;
pub mod github;

// Re-export client types
pub use yahoo::YahooChartClient;
pub use github::{GitHubIssueNotifier, LogNotifier};

/// Supplies one trading day of 1-minute bars for a symbol
#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    async fn fetch(&self, symbol: &str) -> MonitorResult<PriceSeries>;
}

/// Delivers an alert and reports the channel's status code.
///
/// A non-2xx status is a delivery failure, not an `Err`; `Err` is reserved
/// for transport problems and missing credentials.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> MonitorResult<u16>;
}

#[async_trait]
impl<'a, T: SeriesFetcher + ?Sized> SeriesFetcher for &'a T {
    async fn fetch(&self, symbol: &str) -> MonitorResult<PriceSeries> {
        (**self).fetch(symbol).await
    }
}

#[async_trait]
impl<'a, T: Notifier + ?Sized> Notifier for &'a T {
    async fn notify(&self, notification: &Notification) -> MonitorResult<u16> {
        (**self).notify(notification).await
    }
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
