//! Occupancy on the regional commuter corridors outside Jabodetabek.
//!
//! None of these has checkpoint data. Each gets a straight line from a
//! value at the first stop to a value at the last, picked by period and by
//! which end of the corridor the train is heading for.

use crate::domain::{RailTime, Region, Train};

use super::{TimePeriod, lerp};

/// Stations only the Kutoarjo-Yogyakarta local calls at.
const PRAMEKS_STATIONS: &[&str] = &["kutoarjo", "jenar", "wojo", "wates"];

/// A regional corridor with its own occupancy pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corridor {
    /// KRL Yogyakarta to Palur
    YogyaPalur,
    /// Kutoarjo to Yogyakarta local
    Prameks,
    RangkasbitungMerak,
}

impl Corridor {
    /// The corridor a train runs on, or `None` for Jabodetabek trains.
    pub fn of(train: &Train) -> Option<Self> {
        match train.region() {
            Region::Jabodetabek => None,
            Region::RangkasbitungMerak => Some(Corridor::RangkasbitungMerak),
            Region::YogyaSolo => {
                let prameks = train
                    .stations()
                    .iter()
                    .any(|s| PRAMEKS_STATIONS.contains(&s.key()));
                Some(if prameks {
                    Corridor::Prameks
                } else {
                    Corridor::YogyaPalur
                })
            }
        }
    }

    /// Occupancy at the first and last stop of `train`.
    fn endpoints(self, train: &Train, period: TimePeriod) -> (f64, f64) {
        let origin = train.origin().key();
        let terminus = train.terminus().key();
        let peak = matches!(period, TimePeriod::MorningPeak | TimePeriod::EveningPeak);

        match self {
            Corridor::YogyaPalur => {
                // Commuters ride into Yogyakarta in the morning and out in
                // the evening; the load peaks at the Yogyakarta end
                let to_yogya = terminus == "yogyakarta" || origin == "palur";
                let (base, top) = match period {
                    TimePeriod::MorningPeak if to_yogya => (30.0, 95.0),
                    TimePeriod::EveningPeak if !to_yogya => (30.0, 95.0),
                    TimePeriod::Weekend => (40.0, 85.0),
                    _ => (25.0, 65.0),
                };
                if to_yogya { (base, top) } else { (top, base) }
            }
            Corridor::Prameks => {
                let from_kutoarjo =
                    PRAMEKS_STATIONS.contains(&origin) || terminus == "yogyakarta";
                let (start, end) = match period {
                    _ if peak => (35.0, 75.0),
                    TimePeriod::Weekend => (40.0, 65.0),
                    _ => (30.0, 50.0),
                };
                if from_kutoarjo { (start, end) } else { (end, start) }
            }
            Corridor::RangkasbitungMerak => {
                let from_merak = origin == "merak" || terminus == "rangkasbitung";
                let (start, end) = match period {
                    _ if peak => (40.0, 80.0),
                    TimePeriod::Weekend => (35.0, 55.0),
                    _ => (30.0, 45.0),
                };
                if from_merak { (end, start) } else { (start, end) }
            }
        }
    }

    /// Raw per-stop estimates for a train on this corridor.
    pub fn profile(self, train: &Train, at: RailTime) -> Vec<f64> {
        let (start, end) = self.endpoints(train, TimePeriod::of(at));
        let n = train.len();
        if n <= 1 {
            return vec![end; n];
        }
        (0..n)
            .map(|i| lerp(start, end, i as f64 / (n - 1) as f64))
            .collect()
    }
}
