// Yahoo Finance chart API client

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::clients::SeriesFetcher;
use crate::config::DataConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::types::{PriceBar, PriceSeries};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

#[derive(Debug, Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
    interval: String,
    range: String,
}

impl YahooChartClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new(), DataConfig::default())
    }

    pub fn from_config(config: &DataConfig) -> MonitorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, config.clone()))
    }

    fn with_client(client: reqwest::Client, config: DataConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interval: config.interval,
            range: config.range,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the chart for `symbol` at the configured interval and range
    pub async fn fetch_chart(&self, symbol: &str) -> MonitorResult<PriceSeries> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let params = [
            ("interval", self.interval.as_str()),
            ("range", self.range.as_str()),
        ];

        let response = self.client
            .get(&url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::ApiResponse(format!(
                "chart request for {} returned HTTP {}",
                symbol,
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        let bars = parse_chart_response(&json)?;
        debug!("📊 Fetched {} bars for {}", bars.len(), symbol);

        Ok(PriceSeries::new(symbol, self.interval.clone(), bars))
    }
}

impl Default for YahooChartClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeriesFetcher for YahooChartClient {
    async fn fetch(&self, symbol: &str) -> MonitorResult<PriceSeries> {
        self.fetch_chart(symbol).await
    }
}

/// Extract `(timestamp, close)` bars from a chart response.
/// Minutes without trades come back with a null close and are skipped.
pub fn parse_chart_response(json: &Value) -> MonitorResult<Vec<PriceBar>> {
    let chart = json
        .get("chart")
        .ok_or_else(|| MonitorError::DataParse("Missing chart field".to_string()))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown error");
        return Err(MonitorError::ApiResponse(description.to_string()));
    }

    let result = chart["result"]
        .get(0)
        .ok_or_else(|| MonitorError::DataParse("Missing chart result".to_string()))?;

    // A symbol with no trades today has no timestamp array at all
    let timestamps = match result.get("timestamp").and_then(|t| t.as_array()) {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let closes = result["indicators"]["quote"][0]["close"]
        .as_array()
        .ok_or_else(|| MonitorError::DataParse("Missing close prices".to_string()))?;

    let mut bars = Vec::with_capacity(timestamps.len());

    for (ts, close) in timestamps.iter().zip(closes) {
        let close = match close.as_f64() {
            Some(c) => c,
            None => continue,
        };

        let seconds = ts
            .as_i64()
            .ok_or_else(|| MonitorError::DataParse("Invalid timestamp".to_string()))?;

        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| MonitorError::DataParse("Invalid timestamp conversion".to_string()))?;

        bars.push(PriceBar { timestamp, close });
    }

    // Sort by timestamp to ensure chronological order
    bars.sort_by_key(|bar| bar.timestamp);
    bars.dedup_by_key(|bar| bar.timestamp);

    Ok(bars)
}
