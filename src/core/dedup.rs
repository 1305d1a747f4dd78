// Suppress repeated alerts for an unchanged signal state

use std::fmt;

use crate::error::MonitorResult;
use crate::state::StateStore;
use crate::types::CrossoverEvent;

/// Stand-in for "nothing persisted yet"; never equal to a real state
pub const NO_STATE: &str = "NONE";

/// Joins event labels in the persisted state string
pub const STATE_SEPARATOR: &str = "|";

/// Canonical encoding of one run's events: labels in detection order
/// joined by `|`. This string is the deduplication key, so its format must
/// stay stable across releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalState(String);

impl SignalState {
    pub fn from_events(events: &[CrossoverEvent]) -> Self {
        Self(
            events
                .iter()
                .map(CrossoverEvent::label)
                .collect::<Vec<_>>()
                .join(STATE_SEPARATOR),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Same as the stored state
    Suppress,
    /// New state; `previous` is the stored value or `NO_STATE`
    Notify { previous: String },
}

/// Compare a freshly computed state with the stored one
pub fn decide(previous: Option<&str>, current: &SignalState) -> Decision {
    let previous = previous.unwrap_or(NO_STATE);
    if previous == current.as_str() {
        Decision::Suppress
    } else {
        Decision::Notify {
            previous: previous.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Deduplicator<S> {
    store: S,
}

impl<S: StateStore> Deduplicator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn check(&self, current: &SignalState) -> MonitorResult<Decision> {
        let previous = self.store.load()?;
        Ok(decide(previous.as_deref(), current))
    }

    /// Record `current` as notified, overwriting whatever was stored
    pub fn commit(&self, current: &SignalState) -> MonitorResult<()> {
        self.store.save(current.as_str())
    }
}
