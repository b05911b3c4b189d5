//! Route profile estimator.
//!
//! During peak hours, well-known corridors have measured occupancy at a
//! handful of checkpoint stations. Values between checkpoints are
//! interpolated by stop position. Regional corridors outside Jabodetabek
//! have their own linear profiles. Everywhere else the estimate is a
//! triangle that rises from the ends of the route to a band-dependent
//! baseline at the middle.

use std::collections::HashMap;

use crate::domain::{Direction, Line, RailTime, StationName, Train, normalize};

use super::{Corridor, EstimatorStrategy, MIN_OCCUPANCY, TimeBand, lerp, triangular};

/// Measured occupancy at checkpoint stations for one corridor and band.
#[derive(Debug, Clone, Default)]
pub struct CheckpointTable {
    values: HashMap<String, f64>,
}

impl CheckpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, station: &str, value: f64) -> Self {
        self.values.insert(normalize(station), value);
        self
    }

    pub fn get(&self, station: &StationName) -> Option<f64> {
        self.values.get(station.key()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Interpolated values for every stop of a route.
    ///
    /// Returns `None` if no stop of the route is a checkpoint.
    fn interpolate(&self, stops: &[StationName]) -> Option<Vec<f64>> {
        let anchors: Vec<(usize, f64)> = stops
            .iter()
            .enumerate()
            .filter_map(|(i, s)| self.get(s).map(|v| (i, v)))
            .collect();
        if anchors.is_empty() {
            return None;
        }

        let values = (0..stops.len())
            .map(|i| {
                let before = anchors.iter().rev().find(|(j, _)| *j <= i);
                let after = anchors.iter().find(|(j, _)| *j >= i);
                match (before, after) {
                    (Some(&(a, va)), Some(&(b, vb))) if a != b => {
                        lerp(va, vb, (i - a) as f64 / (b - a) as f64)
                    }
                    (Some(&(_, v)), _) | (None, Some(&(_, v))) => v,
                    (None, None) => f64::from(MIN_OCCUPANCY),
                }
            })
            .collect();
        Some(values)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileEstimator {
    tables: HashMap<(Line, Direction, TimeBand), CheckpointTable>,
}

impl ProfileEstimator {
    /// An estimator with no checkpoint tables; every train gets the
    /// triangular shape.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(
        mut self,
        line: Line,
        direction: Direction,
        band: TimeBand,
        table: CheckpointTable,
    ) -> Self {
        self.tables.insert((line, direction, band), table);
        self
    }

    /// Checkpoint tables for the Bogor line rush hours.
    pub fn jabodetabek() -> Self {
        let inbound_morning = CheckpointTable::new()
            .with("Bogor", 0.0)
            .with("Bojong Gede", 105.0)
            .with("Citayam", 105.0)
            .with("Pasar Minggu", 115.0)
            .with("Pasar Minggu Baru", 115.0)
            .with("Manggarai", 120.0)
            .with("Cikini", 80.0)
            .with("Jakarta Kota", 0.0);
        let outbound_evening = CheckpointTable::new()
            .with("Jakarta Kota", 0.0)
            .with("Manggarai", 120.0)
            .with("Pasar Minggu Baru", 115.0)
            .with("Citayam", 105.0)
            .with("Bogor", 0.0);

        Self::new()
            .with_table(
                Line::Bogor,
                Direction::TowardJakarta,
                TimeBand::MorningPeak,
                inbound_morning,
            )
            .with_table(
                Line::Bogor,
                Direction::TowardBogor,
                TimeBand::EveningPeak,
                outbound_evening,
            )
    }
}

/// Occupancy at the middle of the route when no checkpoints apply.
fn baseline(band: TimeBand) -> f64 {
    match band {
        TimeBand::Lunch => 75.0,
        TimeBand::EarlyMidday | TimeBand::LateMidday => 70.0,
        TimeBand::Night => 65.0,
        TimeBand::Weekend => 85.0,
        TimeBand::MorningPeak | TimeBand::EveningPeak => 110.0,
    }
}

impl EstimatorStrategy for ProfileEstimator {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn estimate(&self, train: &Train, at: RailTime) -> Vec<f64> {
        let band = TimeBand::of(at);
        let checkpoints = self
            .tables
            .get(&(train.line(), train.direction(), band))
            .and_then(|table| table.interpolate(train.stations()));

        checkpoints
            .or_else(|| Corridor::of(train).map(|corridor| corridor.profile(train, at)))
            .unwrap_or_else(|| triangular(train.len(), f64::from(MIN_OCCUPANCY), baseline(band)))
    }
}
