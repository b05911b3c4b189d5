//! Flat occupancy from a (line, direction, period) lookup table.

use std::collections::HashMap;

use crate::domain::{Direction, Line, RailTime, Train};

use super::{EstimatorStrategy, TimePeriod};

/// Value used when the table has no cell for a train.
const DEFAULT_OCCUPANCY: u8 = 30;

/// Lookup table of typical occupancy.
///
/// Each cell holds the midpoint of the range observed for a line and
/// direction in one period. The value applies to every stop of the train.
#[derive(Debug, Clone)]
pub struct OccupancyMatrix {
    cells: HashMap<(Line, Direction, TimePeriod), u8>,
    default: u8,
}

impl OccupancyMatrix {
    /// An empty matrix; every lookup yields `default`.
    pub fn new(default: u8) -> Self {
        Self {
            cells: HashMap::new(),
            default,
        }
    }

    /// Set one cell.
    pub fn with_cell(mut self, line: Line, direction: Direction, period: TimePeriod, value: u8) -> Self {
        self.cells.insert((line, direction, period), value);
        self
    }

    /// Set one cell from an observed range, storing its midpoint.
    pub fn with_range(
        self,
        line: Line,
        direction: Direction,
        period: TimePeriod,
        low: u16,
        high: u16,
    ) -> Self {
        let midpoint = (low + high) / 2;
        self.with_cell(line, direction, period, midpoint.min(u16::from(u8::MAX)) as u8)
    }

    /// Set all five periods of a row at once, in the order morning peak,
    /// midday, evening peak, night, weekend.
    fn with_row(self, line: Line, direction: Direction, values: [u8; 5]) -> Self {
        let periods = [
            TimePeriod::MorningPeak,
            TimePeriod::Midday,
            TimePeriod::EveningPeak,
            TimePeriod::Night,
            TimePeriod::Weekend,
        ];
        periods
            .into_iter()
            .zip(values)
            .fold(self, |m, (period, value)| m.with_cell(line, direction, period, value))
    }

    /// Observed occupancy for the Jabodetabek network.
    ///
    /// Several peak cells exceed 100%; output clamping caps them.
    pub fn jabodetabek() -> Self {
        use Direction::*;

        Self::new(DEFAULT_OCCUPANCY)
            .with_row(Line::Bogor, TowardJakarta, [175, 50, 85, 65, 105])
            .with_row(Line::Bogor, TowardBogor, [75, 60, 160, 95, 85])
            .with_row(Line::Cikarang, TowardJakarta, [150, 45, 70, 50, 75])
            .with_row(Line::Cikarang, TowardCikarang, [60, 50, 140, 85, 75])
            .with_row(Line::Rangkasbitung, TowardJakarta, [190, 60, 95, 75, 95])
            .with_row(Line::Rangkasbitung, TowardRangkasbitung, [70, 70, 175, 105, 95])
            .with_row(Line::Tangerang, TowardJakarta, [140, 50, 70, 55, 62])
            .with_row(Line::Tangerang, TowardTangerang, [60, 55, 130, 80, 62])
            .with_row(Line::TanjungPriok, Bidirectional, [30, 22, 32, 22, 27])
    }

    /// Cell value for a train at a time, or the default.
    pub fn lookup(&self, line: Line, direction: Direction, period: TimePeriod) -> u8 {
        self.cells
            .get(&(line, direction, period))
            .copied()
            .unwrap_or(self.default)
    }
}

impl EstimatorStrategy for OccupancyMatrix {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn estimate(&self, train: &Train, at: RailTime) -> Vec<f64> {
        let value = self.lookup(train.line(), train.direction(), TimePeriod::of(at));
        vec![f64::from(value); train.len()]
    }
}
