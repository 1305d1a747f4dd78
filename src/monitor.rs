//! One polling run: gate, fetch, average, detect, dedupe, notify, persist
//!
//! A run performs at most one fetch, one notification, one state read and
//! one state write. Every early exit that is part of normal operation is
//! reported as a `RunOutcome`; only configuration and I/O failures are
//! returned as errors.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::clients::{is_success, Notifier, SeriesFetcher};
use crate::config::{Config, ENV_TICKER};
use crate::core::{
    detect_crossovers, Decision, Deduplicator, GateStatus, MovingAverages, SignalState, TradingGate,
};
use crate::error::{MonitorError, MonitorResult};
use crate::state::StateStore;
use crate::types::{MaWindows, Notification};

/// What the notifier call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered { status: u16 },
    Rejected { status: u16 },
    Failed { reason: String },
}

impl Delivery {
    pub fn succeeded(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Gate closed; nothing was fetched
    OutsideTradingWindow(GateStatus),
    /// Fewer bars than the sample threshold
    InsufficientData { required: usize, available: usize },
    /// No pair crossed between the last two samples
    NoSignal,
    /// Signals found but identical to the stored state
    DuplicateState { state: SignalState },
    /// New state; stored regardless of `delivery`
    Notified { state: SignalState, delivery: Delivery },
}

impl RunOutcome {
    pub fn notified(&self) -> bool {
        matches!(self, RunOutcome::Notified { .. })
    }
}

/// Pipeline settings independent of the collaborators
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Checked only once the gate is open, so a closed market never
    /// reports a missing `TICKER`
    pub symbol: Option<String>,
    pub windows: MaWindows,
    pub min_samples: usize,
    /// Skip the trading-window gate (`--ignore-schedule`)
    pub ignore_schedule: bool,
}

impl MonitorSettings {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            windows: MaWindows::default(),
            min_samples: 80,
            ignore_schedule: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            symbol: config.symbol().ok().map(str::to_string),
            windows: config.windows(),
            min_samples: config.monitor.min_samples,
            ignore_schedule: false,
        }
    }

    pub fn with_schedule_ignored(mut self, ignore: bool) -> Self {
        self.ignore_schedule = ignore;
        self
    }

    pub fn symbol(&self) -> MonitorResult<&str> {
        self.symbol
            .as_deref()
            .ok_or_else(|| MonitorError::ConfigMissing(ENV_TICKER.to_string()))
    }
}

pub struct SignalMonitor<F, N, S> {
    settings: MonitorSettings,
    gate: TradingGate,
    fetcher: F,
    notifier: N,
    dedup: Deduplicator<S>,
}

impl<F, N, S> SignalMonitor<F, N, S>
where
    F: SeriesFetcher,
    N: Notifier,
    S: StateStore,
{
    pub fn new(settings: MonitorSettings, gate: TradingGate, fetcher: F, notifier: N, store: S) -> Self {
        Self {
            settings,
            gate,
            fetcher,
            notifier,
            dedup: Deduplicator::new(store),
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        self.dedup.store()
    }

    /// Full run at `now`. The gate is checked before anything else.
    pub async fn run_at(&self, now: DateTime<Utc>) -> MonitorResult<RunOutcome> {
        let status = self.gate.check(now);
        if self.settings.ignore_schedule {
            debug!("Schedule ignored (gate: {:?})", status);
        } else if !status.is_open() {
            info!(
                "⏸️  Market closed at {} ({:?}), skipping",
                self.gate.local_time(now).format("%Y-%m-%d %H:%M"),
                status
            );
            return Ok(RunOutcome::OutsideTradingWindow(status));
        }

        self.evaluate().await
    }

    pub async fn run(&self) -> MonitorResult<RunOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Everything after the gate
    pub async fn evaluate(&self) -> MonitorResult<RunOutcome> {
        let symbol = self.settings.symbol()?;
        info!("🚀 Checking {} moving average crosses", symbol);

        let series = self.fetcher.fetch(symbol).await?;
        debug!("📊 {} bars for {}", series.len(), symbol);

        let averages = match MovingAverages::compute(&series, self.settings.windows, self.settings.min_samples) {
            Ok(averages) => averages,
            Err(MonitorError::InsufficientData { required, available }) => {
                warn!("⚠️  Insufficient data: {} bars, need {}", available, required);
                return Ok(RunOutcome::InsufficientData { required, available });
            }
            Err(e) => return Err(e),
        };

        let windows = self.settings.windows;
        debug!(
            "📈 MA{}={:?} MA{}={:?} MA{}={:?}",
            windows.short,
            averages.latest(windows.short),
            windows.mid,
            averages.latest(windows.mid),
            windows.long,
            averages.latest(windows.long)
        );

        let events = detect_crossovers(&averages);
        if events.is_empty() {
            info!("➖ No crossover for {}", symbol);
            return Ok(RunOutcome::NoSignal);
        }
        for event in &events {
            info!("🔔 {} {}", symbol, event);
        }

        let state = SignalState::from_events(&events);
        match self.dedup.check(&state)? {
            Decision::Suppress => {
                info!("🔁 Same signal as last run, not notifying");
                return Ok(RunOutcome::DuplicateState { state });
            }
            Decision::Notify { previous } => {
                debug!("Previous state: {}", previous);
            }
        }

        let notification = Notification::for_events(symbol, &events);
        let delivery = match self.notifier.notify(&notification).await {
            Ok(status) if is_success(status) => {
                info!("📨 Notification sent: {}", status);
                Delivery::Delivered { status }
            }
            Ok(status) => {
                warn!("⚠️  Notification rejected: {}", status);
                Delivery::Rejected { status }
            }
            // Missing credentials abort before the state is touched
            Err(e) if e.category() == "config" => return Err(e),
            Err(e) => {
                error!("❌ Notification failed: {}", e);
                Delivery::Failed { reason: e.to_string() }
            }
        };

        self.dedup.commit(&state)?;
        info!("💾 State saved: {}", state);

        Ok(RunOutcome::Notified { state, delivery })
    }
}
