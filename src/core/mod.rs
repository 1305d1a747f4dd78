// Core signal-detection modules

pub mod schedule;
pub mod moving_average;
pub mod crossover;
pub mod dedup;

// Re-export commonly used types
pub use schedule::{exchange_holidays, is_trading_time, GateStatus, TradingCalendar, TradingGate, TradingSession};
pub use moving_average::{simple_moving_average, MovingAverages};
pub use crossover::{classify_cross, detect_crossovers};
pub use dedup::{Decision, Deduplicator, SignalState, NO_STATE, STATE_SEPARATOR};
