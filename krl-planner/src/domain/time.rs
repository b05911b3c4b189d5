//! Timetable time handling.
//!
//! Timetables give clock times as "HH:MM" strings with no date. A
//! [`ServiceTime`] is such a time measured from the midnight that starts the
//! train's service day, so a train running past midnight simply keeps
//! counting past 24:00. A [`RailTime`] pins a time to a calendar date and is
//! what the planner compares and subtracts.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes since the start of a train's service day.
///
/// Values of 24:00 and beyond denote the following calendar day.
///
/// # Examples
///
/// ```
/// use krl_planner::domain::ServiceTime;
///
/// let t = ServiceTime::parse_hhmm("05:06").unwrap();
/// assert_eq!(t.minutes(), 306);
/// assert_eq!(t.to_string(), "05:06");
///
/// // Single-digit hours are accepted
/// assert_eq!(ServiceTime::parse_hhmm("5:06").unwrap(), t);
///
/// assert!(ServiceTime::parse_hhmm("24:00").is_err());
/// assert!(ServiceTime::parse_hhmm("12:7").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Create a service time from minutes past service-day midnight.
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Parse a clock time in "HH:MM" or "H:MM" form.
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hours.is_empty() || hours.len() > 2 {
            return Err(TimeError::new("hour must have one or two digits"));
        }
        if minutes.len() != 2 {
            return Err(TimeError::new("minute must have two digits"));
        }

        let hour = parse_digits(hours).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute =
            parse_digits(minutes).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Returns the minutes past service-day midnight.
    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Returns how many midnights this time lies past its service day start.
    pub fn day_offset(&self) -> u32 {
        self.0 / MINUTES_PER_DAY
    }

    /// Returns the same clock time one day later.
    pub fn next_day(&self) -> Self {
        Self(self.0 + MINUTES_PER_DAY)
    }

    /// Pin this time to a calendar date, treating `service_date` as the day
    /// the train started running.
    pub fn on(&self, service_date: NaiveDate) -> Option<RailTime> {
        let midnight = service_date.and_time(NaiveTime::MIN);
        let dt = midnight.checked_add_signed(Duration::minutes(i64::from(self.0)))?;
        Some(RailTime::from_datetime(dt))
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let of_day = self.0 % MINUTES_PER_DAY;
        write!(f, "{:02}:{:02}", of_day / 60, of_day % 60)
    }
}

/// A date-aware time.
///
/// Searches that start late in the evening can reach trains after midnight,
/// so every comparison the planner makes is between full date-times.
///
/// # Examples
///
/// ```
/// use krl_planner::domain::RailTime;
/// use chrono::{Duration, NaiveDate};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let time = RailTime::parse_hhmm("23:30", date).unwrap();
/// assert_eq!(time.to_string(), "23:30");
///
/// // Adding an hour crosses midnight
/// let later = time.checked_add(Duration::hours(1)).unwrap();
/// assert_eq!(later.to_string(), "00:30");
/// assert_eq!(later.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RailTime {
    date: NaiveDate,
    time: NaiveTime,
}

impl RailTime {
    /// Create a new RailTime from date and time components.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Create a RailTime from a date-time, dropping seconds.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        let time = dt.time();
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        Self {
            date: dt.date(),
            time,
        }
    }

    /// Parse a time from "HH:MM" format on the given date.
    pub fn parse_hhmm(s: &str, date: NaiveDate) -> Result<Self, TimeError> {
        let service = ServiceTime::parse_hhmm(s)?;
        service
            .on(date)
            .ok_or_else(|| TimeError::new("date out of range"))
    }

    /// Returns the date component.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time component.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Converts to a NaiveDateTime.
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Add a duration, advancing the date when midnight is crossed.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let dt = self.to_datetime().checked_add_signed(duration)?;
        Some(Self::from_datetime(dt))
    }

    /// Returns the duration between two times.
    ///
    /// Negative if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.to_datetime()
            .signed_duration_since(other.to_datetime())
    }
}

impl Ord for RailTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

impl PartialOrd for RailTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RailTime({} {:02}:{:02})",
            self.date,
            self.hour(),
            self.minute()
        )
    }
}

impl fmt::Display for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// If a time appears more than this many hours before the previous time in
/// a train's stop sequence, it is taken to be on the next day.
const ROLLOVER_THRESHOLD_HOURS: u32 = 6;

/// Resolve midnight rollover in a train's stop times.
///
/// Takes raw clock times in stop order and returns service times where each
/// backwards jump of more than six hours advances a day. Smaller backwards
/// steps are left as they are; rejecting them is the caller's job.
///
/// # Examples
///
/// ```
/// use krl_planner::domain::{ServiceTime, resolve_rollover};
///
/// let raw: Vec<Option<ServiceTime>> = ["23:40", "23:55", "00:10"]
///     .iter()
///     .map(|s| ServiceTime::parse_hhmm(s).ok())
///     .collect();
/// let resolved = resolve_rollover(&raw);
/// assert_eq!(resolved[2].unwrap().day_offset(), 1);
/// assert_eq!(resolved[2].unwrap().to_string(), "00:10");
/// ```
pub fn resolve_rollover(times: &[Option<ServiceTime>]) -> Vec<Option<ServiceTime>> {
    let mut result = Vec::with_capacity(times.len());
    let mut days = 0u32;
    let mut prev: Option<u32> = None;

    for time in times {
        match time {
            None => result.push(None),
            Some(t) => {
                let clock = t.minutes() % MINUTES_PER_DAY;
                if let Some(p) = prev {
                    if clock + ROLLOVER_THRESHOLD_HOURS * 60 < p {
                        days += 1;
                    }
                }
                result.push(Some(ServiceTime(clock + days * MINUTES_PER_DAY)));
                prev = Some(clock);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn st(s: &str) -> ServiceTime {
        ServiceTime::parse_hhmm(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!(st("00:00").minutes(), 0);
        assert_eq!(st("23:59").minutes(), 23 * 60 + 59);
        assert_eq!(st("9:05").minutes(), 9 * 60 + 5);
        assert_eq!(st(" 08:25 ").minutes(), 8 * 60 + 25);
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ServiceTime::parse_hhmm("").is_err());
        assert!(ServiceTime::parse_hhmm("0830").is_err());
        assert!(ServiceTime::parse_hhmm("08:3").is_err());
        assert!(ServiceTime::parse_hhmm("108:30").is_err());
        assert!(ServiceTime::parse_hhmm("ab:cd").is_err());
        assert!(ServiceTime::parse_hhmm("+8:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(ServiceTime::parse_hhmm("24:00").is_err());
        assert!(ServiceTime::parse_hhmm("12:60").is_err());
    }

    #[test]
    fn service_time_on_date() {
        let t = st("08:50").on(date(2024, 3, 15)).unwrap();
        assert_eq!(t.date(), date(2024, 3, 15));
        assert_eq!(t.to_string(), "08:50");

        let late = st("00:15").next_day().on(date(2024, 3, 15)).unwrap();
        assert_eq!(late.date(), date(2024, 3, 16));
        assert_eq!(late.to_string(), "00:15");
    }

    #[test]
    fn display_wraps_past_midnight() {
        assert_eq!(ServiceTime::from_minutes(24 * 60 + 5).to_string(), "00:05");
        assert_eq!(ServiceTime::from_minutes(24 * 60 + 5).day_offset(), 1);
    }

    #[test]
    fn rail_time_ordering_uses_date() {
        let d = date(2024, 3, 15);
        let late = RailTime::parse_hhmm("23:50", d).unwrap();
        let early_next = RailTime::parse_hhmm("00:10", d.succ_opt().unwrap()).unwrap();
        assert!(late < early_next);
        assert_eq!(
            early_next.signed_duration_since(late),
            Duration::minutes(20)
        );
    }

    #[test]
    fn from_datetime_drops_seconds() {
        let dt = date(2024, 3, 15).and_hms_opt(7, 30, 45).unwrap();
        let t = RailTime::from_datetime(dt);
        assert_eq!(t.time(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
    }

    #[test]
    fn rollover_same_day() {
        let raw = vec![Some(st("10:00")), Some(st("10:30")), Some(st("11:00"))];
        let resolved = resolve_rollover(&raw);
        assert!(resolved.iter().all(|t| t.unwrap().day_offset() == 0));
    }

    #[test]
    fn rollover_crosses_midnight_with_gaps() {
        let raw = vec![Some(st("23:30")), None, Some(st("00:20")), Some(st("00:45"))];
        let resolved = resolve_rollover(&raw);
        assert_eq!(resolved[0].unwrap().day_offset(), 0);
        assert!(resolved[1].is_none());
        assert_eq!(resolved[2].unwrap().minutes(), 24 * 60 + 20);
        assert_eq!(resolved[3].unwrap().minutes(), 24 * 60 + 45);
    }

    #[test]
    fn small_backwards_step_is_not_rollover() {
        let raw = vec![Some(st("10:00")), Some(st("09:50"))];
        let resolved = resolve_rollover(&raw);
        assert_eq!(resolved[1].unwrap().minutes(), 9 * 60 + 50);
    }

    #[test]
    fn exactly_at_threshold_is_not_rollover() {
        let raw = vec![Some(st("12:00")), Some(st("06:00"))];
        let resolved = resolve_rollover(&raw);
        assert_eq!(resolved[1].unwrap().day_offset(), 0);

        let raw = vec![Some(st("12:00")), Some(st("05:59"))];
        let resolved = resolve_rollover(&raw);
        assert_eq!(resolved[1].unwrap().day_offset(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn valid_hhmm_round_trips(hour in 0u32..24, minute in 0u32..60) {
                let s = format!("{hour:02}:{minute:02}");
                let parsed = ServiceTime::parse_hhmm(&s).unwrap();
                prop_assert_eq!(parsed.to_string(), s);
            }

            #[test]
            fn rollover_preserves_length_and_gaps(
                times in prop::collection::vec(prop::option::of(0u32..1440), 0..20)
            ) {
                let raw: Vec<Option<ServiceTime>> =
                    times.iter().map(|t| t.map(ServiceTime::from_minutes)).collect();
                let resolved = resolve_rollover(&raw);
                prop_assert_eq!(resolved.len(), raw.len());
                for (a, b) in raw.iter().zip(&resolved) {
                    prop_assert_eq!(a.is_none(), b.is_none());
                }
            }

            #[test]
            fn rollover_keeps_clock_time(
                times in prop::collection::vec(0u32..1440, 1..20)
            ) {
                let raw: Vec<Option<ServiceTime>> =
                    times.iter().map(|t| Some(ServiceTime::from_minutes(*t))).collect();
                for (a, b) in raw.iter().zip(resolve_rollover(&raw)) {
                    prop_assert_eq!(a.unwrap().minutes(), b.unwrap().minutes() % 1440);
                }
            }
        }
    }
}
