//! Time-of-week classification for occupancy estimates.

use chrono::{Datelike, NaiveTime, Weekday};

use crate::domain::RailTime;

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn is_weekend(at: RailTime) -> bool {
    matches!(at.date().weekday(), Weekday::Sat | Weekday::Sun)
}

/// Coarse period used by the occupancy matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimePeriod {
    /// 05:30 to 08:30 on weekdays
    MorningPeak,
    /// 09:00 to 15:00 on weekdays
    Midday,
    /// 15:30 to 19:00 on weekdays
    EveningPeak,
    /// Any other weekday time, including the gaps between the windows above
    Night,
    Weekend,
}

impl TimePeriod {
    /// Classify a reference time. Weekends override time of day.
    pub fn of(at: RailTime) -> Self {
        if is_weekend(at) {
            return TimePeriod::Weekend;
        }

        let t = at.time();
        if t >= hm(5, 30) && t < hm(8, 30) {
            TimePeriod::MorningPeak
        } else if t >= hm(9, 0) && t < hm(15, 0) {
            TimePeriod::Midday
        } else if t >= hm(15, 30) && t < hm(19, 0) {
            TimePeriod::EveningPeak
        } else {
            TimePeriod::Night
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::MorningPeak => "morning_peak",
            TimePeriod::Midday => "midday",
            TimePeriod::EveningPeak => "evening_peak",
            TimePeriod::Night => "night",
            TimePeriod::Weekend => "weekend",
        }
    }
}

/// Finer bands used by the profile estimator.
///
/// Unlike [`TimePeriod`] the weekday bands tile the day with no gaps, which
/// lets the off-peak baseline tell the lunch crowd from the shoulder hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeBand {
    MorningPeak,
    EarlyMidday,
    Lunch,
    LateMidday,
    EveningPeak,
    Night,
    Weekend,
}

impl TimeBand {
    pub fn of(at: RailTime) -> Self {
        if is_weekend(at) {
            return TimeBand::Weekend;
        }

        let t = at.time();
        if t >= hm(5, 30) && t < hm(8, 30) {
            TimeBand::MorningPeak
        } else if t >= hm(8, 30) && t < hm(12, 0) {
            TimeBand::EarlyMidday
        } else if t >= hm(12, 0) && t < hm(14, 0) {
            TimeBand::Lunch
        } else if t >= hm(14, 0) && t < hm(15, 30) {
            TimeBand::LateMidday
        } else if t >= hm(15, 30) && t < hm(19, 0) {
            TimeBand::EveningPeak
        } else {
            TimeBand::Night
        }
    }

    /// True for the weekday rush-hour bands.
    pub fn is_peak(&self) -> bool {
        matches!(self, TimeBand::MorningPeak | TimeBand::EveningPeak)
    }
}
