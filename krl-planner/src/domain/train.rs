//! Train (scheduled run) type.

use std::collections::HashSet;

use super::{
    Direction, DomainError, Line, Region, ServiceTime, StationName, classify_direction,
    classify_line, classify_region, resolve_rollover,
};

/// Index of a stop within a train's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopIndex(pub usize);

/// A single scheduled train run.
///
/// Each stop has one clock time, used both for boarding and for alighting.
/// A stop may have no time at all, in which case it cannot be the end of a
/// leg. Line, direction and region are derived from the route when the
/// train is built.
///
/// # Invariants
///
/// - At least one stop
/// - No station appears twice
/// - Known stop times are non-decreasing along the route (after midnight
///   rollover has been resolved)
#[derive(Debug, Clone)]
pub struct Train {
    id: String,
    name: String,
    stations: Vec<StationName>,
    times: Vec<Option<ServiceTime>>,
    line: Line,
    direction: Direction,
    region: Region,
}

impl Train {
    /// Build a train, validating its route and schedule.
    ///
    /// Times are raw clock times in stop order; a backwards jump of more than
    /// six hours is read as crossing midnight.
    ///
    /// # Examples
    ///
    /// ```
    /// use krl_planner::domain::{Line, ServiceTime, StationName, Train};
    ///
    /// let stop = |name: &str, time: &str| {
    ///     (StationName::parse(name).unwrap(), ServiceTime::parse_hhmm(time).ok())
    /// };
    /// let train = Train::new(
    ///     "1001",
    ///     "Commuter Line Bogor",
    ///     vec![stop("Bogor", "08:00"), stop("Depok", "08:25"), stop("Manggarai", "08:50")],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(train.line(), Line::Bogor);
    /// assert_eq!(train.len(), 3);
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        stops: Vec<(StationName, Option<ServiceTime>)>,
    ) -> Result<Self, DomainError> {
        if stops.is_empty() {
            return Err(DomainError::EmptyRoute);
        }

        let (stations, raw_times): (Vec<StationName>, Vec<Option<ServiceTime>>) =
            stops.into_iter().unzip();

        let mut seen = HashSet::with_capacity(stations.len());
        for station in &stations {
            if !seen.insert(station.key()) {
                return Err(DomainError::DuplicateStop(station.clone()));
            }
        }

        let times = resolve_rollover(&raw_times);
        let mut prev: Option<ServiceTime> = None;
        for (station, time) in stations.iter().zip(&times) {
            if let Some(t) = time {
                if prev.is_some_and(|p| *t < p) {
                    return Err(DomainError::NonMonotonicSchedule {
                        station: station.clone(),
                    });
                }
                prev = Some(*t);
            }
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            line: classify_line(&stations),
            direction: classify_direction(&stations),
            region: classify_region(&stations),
            stations,
            times,
        })
    }

    /// Returns the opaque train identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stations in calling order.
    pub fn stations(&self) -> &[StationName] {
        &self.stations
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always false: a train has at least one stop.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Returns the station at a stop index.
    pub fn station(&self, idx: StopIndex) -> Option<&StationName> {
        self.stations.get(idx.0)
    }

    /// Returns the scheduled time at a stop index, if known.
    pub fn time_at(&self, idx: StopIndex) -> Option<ServiceTime> {
        self.times.get(idx.0).copied().flatten()
    }

    /// Returns the scheduled time at a station, if the train calls there and
    /// the time is known.
    pub fn time_at_station(&self, station: &StationName) -> Option<ServiceTime> {
        self.index_of(station).and_then(|idx| self.time_at(idx))
    }

    /// Finds the stop index of a station.
    pub fn index_of(&self, station: &StationName) -> Option<StopIndex> {
        self.stations
            .iter()
            .position(|s| s == station)
            .map(StopIndex)
    }

    /// Returns true if the train calls at the station.
    pub fn calls_at(&self, station: &StationName) -> bool {
        self.index_of(station).is_some()
    }

    /// First station of the route.
    pub fn origin(&self) -> &StationName {
        // Non-empty by construction
        &self.stations[0]
    }

    /// Last station of the route.
    pub fn terminus(&self) -> &StationName {
        &self.stations[self.stations.len() - 1]
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Minutes between consecutive stops with known times.
    ///
    /// Entry `i` is the travel time from stop `i - 1` to stop `i`; entry 0
    /// and any entry touching a stop with no time are `None`.
    pub fn segment_minutes(&self) -> Vec<Option<u32>> {
        let mut out = Vec::with_capacity(self.times.len());
        out.push(None);
        for pair in self.times.windows(2) {
            out.push(match (pair[0], pair[1]) {
                (Some(a), Some(b)) => Some(b.minutes() - a.minutes()),
                _ => None,
            });
        }
        out
    }
}
