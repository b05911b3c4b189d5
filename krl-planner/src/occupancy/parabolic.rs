//! Parabolic estimator centred on a hub station.
//!
//! Occupancy peaks at the hub and falls off with the square of the stop
//! distance from it. Trains that never reach the hub are estimated with
//! the drift model instead.

use crate::domain::{RailTime, StationName, Train};

use super::drift::{DriftParams, drift_profile};
use super::EstimatorStrategy;

#[derive(Debug, Clone, PartialEq)]
pub struct ParabolicParams {
    /// Station where occupancy peaks
    pub hub: String,
    /// Occupancy at the hub
    pub peak: f64,
    /// Occupancy at the calibration stop
    pub initial: f64,
}

impl Default for ParabolicParams {
    fn default() -> Self {
        Self {
            hub: "Manggarai".to_string(),
            peak: 90.0,
            initial: 20.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParabolicEstimator {
    params: ParabolicParams,
    fallback: DriftParams,
}

impl ParabolicEstimator {
    pub fn new(params: ParabolicParams, fallback: DriftParams) -> Self {
        Self { params, fallback }
    }

    fn hub_index(&self, train: &Train) -> Option<usize> {
        let hub = StationName::parse(&self.params.hub).ok()?;
        train.index_of(&hub).map(|idx| idx.0)
    }
}

impl EstimatorStrategy for ParabolicEstimator {
    fn name(&self) -> &'static str {
        "parabolic"
    }

    fn estimate(&self, train: &Train, at: RailTime) -> Vec<f64> {
        let Some(hub) = self.hub_index(train) else {
            return drift_profile(&self.fallback, train, at);
        };
        let n = train.len();

        // Calibrate the curve on the first stop, or on the farthest stop
        // when the hub is itself the first stop
        let span = if hub == 0 { n - 1 } else { hub };
        if span == 0 {
            return vec![self.params.peak; n];
        }
        let k = (self.params.peak - self.params.initial) / (span * span) as f64;

        (0..n)
            .map(|i| {
                let d = i.abs_diff(hub) as f64;
                self.params.peak - k * d * d
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::occupancy::{MAX_OCCUPANCY, MIN_OCCUPANCY};

    #[test]
    fn peaks_at_hub() {
        let est = ParabolicEstimator::default();
        let train = bogor_to_kota();
        let values = est.estimate(&train, weekday("07:00"));

        // Manggarai is stop 8 of 13
        assert_eq!(values[8], 90.0);
        assert_eq!(values[0], 20.0);
        let max = values.iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(max, values[8]);
        assert!(values[7] < values[8] && values[9] < values[8]);
    }

    #[test]
    fn far_side_of_hub_may_clamp() {
        let est = ParabolicEstimator::new(
            ParabolicParams {
                hub: "Depok".to_string(),
                peak: 90.0,
                initial: 20.0,
            },
            DriftParams::default(),
        );
        let map = est.predict(&bogor_to_kota(), weekday("07:00"));
        let kota = StationName::parse("Jakarta Kota").unwrap();
        assert_eq!(map.get(&kota), Some(MIN_OCCUPANCY));
        let depok = StationName::parse("Depok").unwrap();
        assert_eq!(map.get(&depok), Some(90));
        assert!(map.iter().all(|(_, v)| v <= MAX_OCCUPANCY));
    }

    #[test]
    fn hub_first_calibrates_on_last_stop() {
        let est = ParabolicEstimator::default();
        let train = make_train(
            "M",
            &[("Manggarai", "09:00"), ("Tebet", "09:04"), ("Pasar Minggu", "09:12")],
        );
        let values = est.estimate(&train, weekday("09:00"));
        assert_eq!(values, vec![90.0, 72.5, 20.0]);
    }

    #[test]
    fn without_hub_falls_back_to_drift() {
        let est = ParabolicEstimator::default();
        let train = make_train("S", &[("Tanah Abang", "11:00"), ("Serpong", "11:30")]);
        let expected = drift_profile(&DriftParams::default(), &train, weekday("11:00"));
        assert_eq!(est.estimate(&train, weekday("11:00")), expected);
    }

    #[test]
    fn single_stop_at_hub() {
        let est = ParabolicEstimator::default();
        let train = make_train("H", &[("Manggarai", "09:00")]);
        assert_eq!(est.estimate(&train, weekday("09:00")), vec![90.0]);
    }
}
