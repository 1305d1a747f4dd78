// Trading-window gate: is the exchange open right now?

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, Utc, Weekday};
use std::collections::BTreeSet;

/// An inclusive time-of-day interval in exchange-local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingSession {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TradingSession {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Tokyo Stock Exchange sessions: morning 09:00-11:30, afternoon 12:30-15:30
pub fn default_sessions() -> Vec<TradingSession> {
    vec![
        TradingSession::new(hm(9, 0), hm(11, 30)),
        TradingSession::new(hm(12, 30), hm(15, 30)),
    ]
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// True if `t` falls inside either default session, bounds inclusive.
/// Covers the lunch recess and out-of-hours; weekends are not considered.
pub fn is_trading_time(t: NaiveTime) -> bool {
    default_sessions().iter().any(|s| s.contains(t))
}

/// Tokyo Stock Exchange closures: national holidays, substitute holidays
/// and the year-end break (Dec 31 - Jan 3)
const TSE_CLOSURES: [(i32, u32, u32); 22] = [
    (2026, 11, 3),
    (2026, 11, 23),
    (2026, 12, 31),
    (2027, 1, 1),
    (2027, 1, 2),
    (2027, 1, 3),
    (2027, 1, 11),
    (2027, 2, 11),
    (2027, 2, 23),
    (2027, 3, 22),
    (2027, 4, 29),
    (2027, 5, 3),
    (2027, 5, 4),
    (2027, 5, 5),
    (2027, 7, 19),
    (2027, 8, 11),
    (2027, 9, 20),
    (2027, 9, 23),
    (2027, 10, 11),
    (2027, 11, 3),
    (2027, 11, 23),
    (2027, 12, 31),
];

/// Exchange closure dates through the end of 2027
pub fn exchange_holidays() -> Vec<NaiveDate> {
    TSE_CLOSURES
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

/// Weekends plus an explicit holiday list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradingCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(holidays: I) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Weekends plus the Tokyo exchange closures
    pub fn tokyo() -> Self {
        Self::new(exchange_holidays())
    }

    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Open,
    OutsideSession, // lunch recess, before open, after close
    NonTradingDay,  // weekend or holiday
}

impl GateStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, GateStatus::Open)
    }
}

/// Decides whether a run may proceed. Must be consulted before any I/O.
#[derive(Debug, Clone)]
pub struct TradingGate {
    offset: FixedOffset,
    sessions: Vec<TradingSession>,
    calendar: Option<TradingCalendar>,
}

impl Default for TradingGate {
    /// Tokyo hours and the Tokyo exchange calendar
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix()),
            sessions: default_sessions(),
            calendar: Some(TradingCalendar::tokyo()),
        }
    }
}

impl TradingGate {
    /// Returns `None` when the offset is out of range
    pub fn new(
        utc_offset_hours: i32,
        sessions: Vec<TradingSession>,
        calendar: Option<TradingCalendar>,
    ) -> Option<Self> {
        let offset = FixedOffset::east_opt(utc_offset_hours.checked_mul(3600)?)?;
        Some(Self { offset, sessions, calendar })
    }

    pub fn local_time(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    pub fn is_trading_time(&self, t: NaiveTime) -> bool {
        self.sessions.iter().any(|s| s.contains(t))
    }

    pub fn check(&self, now: DateTime<Utc>) -> GateStatus {
        let local = self.local_time(now);

        if let Some(calendar) = &self.calendar {
            if !calendar.is_trading_day(local.date_naive()) {
                return GateStatus::NonTradingDay;
            }
        }

        if self.is_trading_time(local.time()) {
            GateStatus::Open
        } else {
            GateStatus::OutsideSession
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.check(now).is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_session_bounds_are_inclusive() {
        for (h, m) in [(9, 0), (10, 15), (11, 30), (12, 30), (14, 0), (15, 30)] {
            assert!(is_trading_time(t(h, m)), "{:02}:{:02} should be open", h, m);
        }
    }

    #[test]
    fn test_outside_sessions() {
        for (h, m) in [(8, 59), (11, 31), (12, 0), (12, 29), (15, 31), (0, 0), (23, 59)] {
            assert!(!is_trading_time(t(h, m)), "{:02}:{:02} should be closed", h, m);
        }
    }

    #[test]
    fn test_seconds_past_close() {
        let just_after = NaiveTime::from_hms_opt(11, 30, 1).unwrap();
        assert!(!is_trading_time(just_after));
    }

    #[test]
    fn test_calendar_weekend_and_holiday() {
        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let calendar = TradingCalendar::new([new_year]);

        assert!(!calendar.is_trading_day(new_year));
        // 2026-10-17 is a Saturday, 2026-10-19 a Monday
        assert!(!calendar.is_trading_day(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()));
        assert!(calendar.is_trading_day(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
    }

    #[test]
    fn test_gate_uses_exchange_offset() {
        let gate = TradingGate::default();

        // 01:00 UTC Monday = 10:00 JST
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 1, 0, 0).unwrap();
        assert_eq!(gate.check(now), GateStatus::Open);

        // 03:00 UTC = 12:00 JST, lunch recess
        let lunch = Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap();
        assert_eq!(gate.check(lunch), GateStatus::OutsideSession);
    }

    #[test]
    fn test_gate_weekend() {
        let gate = TradingGate::default();
        // Saturday 10:00 JST
        let saturday = Utc.with_ymd_and_hms(2026, 10, 17, 1, 0, 0).unwrap();
        assert_eq!(gate.check(saturday), GateStatus::NonTradingDay);
        assert!(!gate.is_active(saturday));
    }

    #[test]
    fn test_gate_without_calendar_ignores_weekends() {
        let gate = TradingGate::new(9, default_sessions(), None).unwrap();
        let saturday = Utc.with_ymd_and_hms(2026, 10, 17, 1, 0, 0).unwrap();
        assert!(gate.is_active(saturday));
    }

    #[test]
    fn test_tokyo_calendar_closures() {
        let calendar = TradingCalendar::tokyo();
        let closed = [(2027, 1, 11), (2027, 3, 22), (2027, 5, 4), (2027, 12, 31)];
        for (y, m, d) in closed {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            assert!(!calendar.is_trading_day(date), "{} should be closed", date);
        }
        assert!(calendar.is_trading_day(NaiveDate::from_ymd_opt(2027, 1, 4).unwrap()));
        assert_eq!(exchange_holidays().len(), TSE_CLOSURES.len());
    }

    #[test]
    fn test_default_gate_closed_on_coming_of_age_day() {
        // Monday 2027-01-11 10:00 JST
        let holiday = Utc.with_ymd_and_hms(2027, 1, 11, 1, 0, 0).unwrap();
        assert_eq!(TradingGate::default().check(holiday), GateStatus::NonTradingDay);
    }

    #[test]
    fn test_invalid_offset() {
        assert!(TradingGate::new(30, default_sessions(), None).is_none());
    }
}
