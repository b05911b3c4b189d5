//! Passenger occupancy estimation.
//!
//! Several estimators are available, all behind [`EstimatorStrategy`]. A
//! deployment picks one with [`EstimatorKind`]; whichever is chosen, the
//! output is a per-station percentage clamped to
//! [`MIN_OCCUPANCY`]..=[`MAX_OCCUPANCY`].

mod confidence;
mod drift;
mod matrix;
mod parabolic;
mod period;
mod profile;
mod regional;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::{RailTime, StationName, Train, UnknownVariant};

pub use confidence::confidence;
pub use drift::{DriftEstimator, DriftParams};
pub use matrix::OccupancyMatrix;
pub use parabolic::{ParabolicEstimator, ParabolicParams};
pub use period::{TimeBand, TimePeriod};
pub use profile::{CheckpointTable, ProfileEstimator};
pub use regional::Corridor;

/// Lowest occupancy ever reported, in percent.
pub const MIN_OCCUPANCY: u8 = 5;

/// Highest occupancy ever reported, in percent.
pub const MAX_OCCUPANCY: u8 = 98;

/// Clamp a raw estimate into the reportable range.
///
/// Fractions are truncated. NaN is treated as the minimum.
pub fn clamp(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_OCCUPANCY;
    }
    raw.clamp(f64::from(MIN_OCCUPANCY), f64::from(MAX_OCCUPANCY)) as u8
}

/// An occupancy estimator.
///
/// Implementors only produce raw per-stop values; clamping and packaging
/// happen in [`EstimatorStrategy::predict`] so every strategy honours the
/// same range.
pub trait EstimatorStrategy: Send + Sync {
    /// Short name used in logs and responses.
    fn name(&self) -> &'static str;

    /// Raw estimates, one per stop in route order.
    fn estimate(&self, train: &Train, at: RailTime) -> Vec<f64>;

    /// Per-station occupancy for a train at a reference time.
    fn predict(&self, train: &Train, at: RailTime) -> OccupancyMap {
        let raw = self.estimate(train, at);
        let entries = train
            .stations()
            .iter()
            .zip(&raw)
            .map(|(station, value)| (station.clone(), clamp(*value)))
            .collect();

        OccupancyMap {
            entries,
            confidence: confidence(&raw),
        }
    }
}

/// Predicted occupancy per station, in route order.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyMap {
    entries: Vec<(StationName, u8)>,
    confidence: f64,
}

impl OccupancyMap {
    /// Occupancy at a station, if the train calls there.
    pub fn get(&self, station: &StationName) -> Option<u8> {
        self.entries
            .iter()
            .find(|(s, _)| s == station)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StationName, u8)> {
        self.entries.iter().map(|(s, v)| (s, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Heuristic trust in the estimate, from 0.0 to 1.0.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Which estimator a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatorKind {
    #[default]
    Matrix,
    Profile,
    Parabolic,
    Drift,
}

impl EstimatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimatorKind::Matrix => "matrix",
            EstimatorKind::Profile => "profile",
            EstimatorKind::Parabolic => "parabolic",
            EstimatorKind::Drift => "drift",
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimatorKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "matrix" => Ok(EstimatorKind::Matrix),
            "profile" => Ok(EstimatorKind::Profile),
            "parabolic" => Ok(EstimatorKind::Parabolic),
            "drift" => Ok(EstimatorKind::Drift),
            _ => Err(UnknownVariant::new("estimator", s)),
        }
    }
}

/// The occupancy model a deployment runs with.
///
/// Cheap to clone; the strategy is shared.
#[derive(Clone)]
pub struct OccupancyModel {
    strategy: Arc<dyn EstimatorStrategy>,
}

impl OccupancyModel {
    /// Build the model for a strategy kind with the network's default
    /// parameters.
    pub fn from_kind(kind: EstimatorKind) -> Self {
        let strategy: Arc<dyn EstimatorStrategy> = match kind {
            EstimatorKind::Matrix => Arc::new(OccupancyMatrix::jabodetabek()),
            EstimatorKind::Profile => Arc::new(ProfileEstimator::jabodetabek()),
            EstimatorKind::Parabolic => Arc::new(ParabolicEstimator::default()),
            EstimatorKind::Drift => Arc::new(DriftEstimator::default()),
        };
        Self { strategy }
    }

    /// Wrap a custom strategy.
    pub fn with_strategy(strategy: impl EstimatorStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Per-station occupancy for a train at a reference time.
    pub fn predict(&self, train: &Train, at: RailTime) -> OccupancyMap {
        self.strategy.predict(train, at)
    }
}

impl Default for OccupancyModel {
    fn default() -> Self {
        Self::from_kind(EstimatorKind::default())
    }
}

impl fmt::Debug for OccupancyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OccupancyModel({})", self.strategy.name())
    }
}

/// Linear interpolation between two values by fraction `t` in `[0, 1]`.
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Triangular profile: `edge` at both ends of the route, `apex` at the
/// middle stop.
fn triangular(stops: usize, edge: f64, apex: f64) -> Vec<f64> {
    if stops <= 1 {
        return vec![apex; stops];
    }
    let last = stops - 1;
    let mid = last / 2;
    (0..stops)
        .map(|i| {
            if mid == 0 {
                // Two stops: rise to the apex at the first, fall at the last
                if i == 0 { apex } else { edge }
            } else if i <= mid {
                lerp(edge, apex, i as f64 / mid as f64)
            } else {
                lerp(apex, edge, (i - mid) as f64 / (last - mid) as f64)
            }
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(-20.0), MIN_OCCUPANCY);
        assert_eq!(clamp(0.0), MIN_OCCUPANCY);
        assert_eq!(clamp(42.9), 42);
        assert_eq!(clamp(175.0), MAX_OCCUPANCY);
        assert_eq!(clamp(f64::NAN), MIN_OCCUPANCY);
        assert_eq!(clamp(f64::INFINITY), MAX_OCCUPANCY);
    }

    #[test]
    fn kind_parse() {
        assert_eq!("Profile".parse::<EstimatorKind>().unwrap(), EstimatorKind::Profile);
        assert_eq!(" drift ".parse::<EstimatorKind>().unwrap(), EstimatorKind::Drift);
        assert!("neural".parse::<EstimatorKind>().is_err());
        assert_eq!(EstimatorKind::default(), EstimatorKind::Matrix);
    }

    #[test]
    fn model_reports_strategy_name() {
        for kind in [
            EstimatorKind::Matrix,
            EstimatorKind::Profile,
            EstimatorKind::Parabolic,
            EstimatorKind::Drift,
        ] {
            assert_eq!(OccupancyModel::from_kind(kind).name(), kind.as_str());
        }
    }

    #[test]
    fn map_lookup_by_station() {
        let model = OccupancyModel::default();
        let map = model.predict(&bogor_to_kota(), weekday("07:00"));
        assert_eq!(map.len(), 13);
        let manggarai = StationName::parse("MANGGARAI").unwrap();
        assert!(map.get(&manggarai).is_some());
        assert!(map.get(&StationName::parse("Serpong").unwrap()).is_none());
    }

    #[test]
    fn triangular_shape() {
        let values = triangular(5, 5.0, 65.0);
        assert_eq!(values, vec![5.0, 35.0, 65.0, 35.0, 5.0]);
        assert_eq!(triangular(1, 5.0, 65.0), vec![65.0]);
        assert_eq!(triangular(2, 5.0, 65.0), vec![65.0, 5.0]);
        assert!(triangular(0, 5.0, 65.0).is_empty());
    }

    fn route_strategy() -> impl Strategy<Value = Vec<(String, u32)>> {
        // Distinct station names with increasing times
        prop::collection::vec(1u32..15, 1..20).prop_map(|gaps| {
            let stations = [
                "Bogor", "Cilebut", "Bojong Gede", "Citayam", "Depok", "Pondok Cina",
                "Universitas Indonesia", "Lenteng Agung", "Pasar Minggu", "Kalibata",
                "Tebet", "Manggarai", "Cikini", "Gondangdia", "Juanda", "Sawah Besar",
                "Mangga Besar", "Jayakarta", "Jakarta Kota",
            ];
            let mut t = 5 * 60;
            gaps.iter()
                .zip(stations.iter())
                .map(|(gap, name)| {
                    t += gap;
                    (name.to_string(), t)
                })
                .collect()
        })
    }

    fn train_from(route: &[(String, u32)], reversed: bool) -> Train {
        let mut stops: Vec<(StationName, Option<crate::domain::ServiceTime>)> = route
            .iter()
            .map(|(name, t)| {
                (
                    StationName::parse(name).unwrap(),
                    Some(crate::domain::ServiceTime::from_minutes(*t)),
                )
            })
            .collect();
        if reversed {
            let times: Vec<_> = stops.iter().map(|(_, t)| *t).collect();
            stops.reverse();
            for (stop, t) in stops.iter_mut().zip(times) {
                stop.1 = t;
            }
        }
        Train::new("P", "Prop", stops).unwrap()
    }

    proptest! {
        #[test]
        fn every_strategy_stays_in_range(
            route in route_strategy(),
            reversed in any::<bool>(),
            minute in 0u32..(7 * 24 * 60),
        ) {
            let train = train_from(&route, reversed);
            let base = chrono::NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
            let at = crate::domain::ServiceTime::from_minutes(minute).on(base).unwrap();

            for kind in [
                EstimatorKind::Matrix,
                EstimatorKind::Profile,
                EstimatorKind::Parabolic,
                EstimatorKind::Drift,
            ] {
                let map = OccupancyModel::from_kind(kind).predict(&train, at);
                prop_assert_eq!(map.len(), train.len());
                for (_, value) in map.iter() {
                    prop_assert!(
                        (MIN_OCCUPANCY..=MAX_OCCUPANCY).contains(&value),
                        "{} produced {}", kind, value
                    );
                }
                prop_assert!((0.0..=1.0).contains(&map.confidence()));
            }
        }

        #[test]
        fn prediction_is_deterministic(route in route_strategy(), minute in 0u32..1440) {
            let train = train_from(&route, false);
            let at = crate::domain::ServiceTime::from_minutes(minute)
                .on(chrono::NaiveDate::from_ymd_opt(2024, 3, 13).unwrap())
                .unwrap();
            for kind in [EstimatorKind::Profile, EstimatorKind::Drift] {
                let model = OccupancyModel::from_kind(kind);
                prop_assert_eq!(model.predict(&train, at), model.predict(&train, at));
            }
        }
    }
}
