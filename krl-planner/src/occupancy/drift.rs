//! Cumulative drift estimator.
//!
//! Occupancy starts at a base level and accumulates along the route: every
//! minute of running adds passengers, while a linear drain models riders
//! leaving as the train nears its terminus.

use crate::domain::{RailTime, Train};

use super::{EstimatorStrategy, TimeBand};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftParams {
    /// Occupancy at the first stop during peak bands
    pub base_peak: f64,
    /// Occupancy at the first stop otherwise
    pub base_off_peak: f64,
    /// Added per minute of running between consecutive stops
    pub per_minute: f64,
    /// Drain at the last stop. Each stop subtracts this scaled by its
    /// progress along the route, so the total over a route of `n` stops is
    /// about `drain * n / 2`.
    pub drain: f64,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            base_peak: 35.0,
            base_off_peak: 15.0,
            per_minute: 1.2,
            drain: 30.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriftEstimator {
    params: DriftParams,
}

impl DriftEstimator {
    pub fn new(params: DriftParams) -> Self {
        Self { params }
    }
}

impl EstimatorStrategy for DriftEstimator {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn estimate(&self, train: &Train, at: RailTime) -> Vec<f64> {
        drift_profile(&self.params, train, at)
    }
}

/// Shared with the parabolic estimator, which falls back to drift.
pub(super) fn drift_profile(params: &DriftParams, train: &Train, at: RailTime) -> Vec<f64> {
    let n = train.len();
    if n == 0 {
        return Vec::new();
    }

    let base = if TimeBand::of(at).is_peak() {
        params.base_peak
    } else {
        params.base_off_peak
    };
    let segments = train.segment_minutes();

    let mut values = Vec::with_capacity(n);
    let mut current = base;
    values.push(current);
    for i in 1..n {
        // Unknown segment times contribute nothing
        let minutes = segments.get(i).copied().flatten().unwrap_or(0);
        let drained = params.drain * i as f64 / (n - 1) as f64;
        current = (current + params.per_minute * f64::from(minutes) - drained)
            .clamp(f64::from(super::MIN_OCCUPANCY), f64::from(super::MAX_OCCUPANCY));
        values.push(current);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn peak_starts_higher() {
        let est = DriftEstimator::default();
        let train = bogor_to_kota();
        let peak = est.estimate(&train, weekday("07:00"));
        let off = est.estimate(&train, weekday("11:00"));
        assert_eq!(peak[0], 35.0);
        assert_eq!(off[0], 15.0);
        assert!(peak.iter().zip(&off).all(|(p, o)| p >= o));
    }

    #[test]
    fn accumulates_minutes_and_drains() {
        let est = DriftEstimator::new(DriftParams {
            base_peak: 40.0,
            base_off_peak: 20.0,
            per_minute: 2.0,
            drain: 10.0,
        });
        let train = make_train("D", &[("Bogor", "11:00"), ("Cilebut", "11:10"), ("Depok", "11:20")]);
        let values = est.estimate(&train, weekday("11:00"));
        // 20 + 20 - 5 = 35, then 35 + 20 - 10 = 45
        assert_eq!(values, vec![20.0, 35.0, 45.0]);
    }

    #[test]
    fn drain_scales_with_progress() {
        let est = DriftEstimator::new(DriftParams {
            base_off_peak: 50.0,
            per_minute: 0.0,
            drain: 12.0,
            ..DriftParams::default()
        });
        let train = make_train(
            "D",
            &[
                ("Bogor", "11:00"),
                ("Cilebut", "11:06"),
                ("Bojong Gede", "11:11"),
                ("Citayam", "11:17"),
            ],
        );
        let values = est.estimate(&train, weekday("11:00"));
        // Steps of 4, 8 and 12: 24 drained in total
        assert_eq!(values, vec![50.0, 46.0, 38.0, 26.0]);
    }

    #[test]
    fn missing_times_add_nothing() {
        let est = DriftEstimator::new(DriftParams {
            drain: 0.0,
            ..DriftParams::default()
        });
        let train = make_train("D", &[("Bogor", "11:00"), ("Cilebut", "-"), ("Depok", "11:20")]);
        let values = est.estimate(&train, weekday("11:00"));
        assert_eq!(values, vec![15.0, 15.0, 15.0]);
    }

    #[test]
    fn single_stop() {
        let est = DriftEstimator::default();
        let train = make_train("D", &[("Bogor", "11:00")]);
        assert_eq!(est.estimate(&train, weekday("11:00")), vec![15.0]);
    }
}
