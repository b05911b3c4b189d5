//! Timetable storage.
//!
//! The store is built once from validated trains and never changes. Its
//! station index answers "which trains call at X?" in constant time, which
//! is the only question the search asks of it.

mod loader;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::{Region, StationName, Train};

pub use loader::{LoadError, load_path, load_reader};

/// Error building a timetable from trains.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimetableError {
    /// Two trains share an id
    #[error("duplicate train id: {0}")]
    DuplicateTrainId(String),
}

/// Read-only collection of trains with a station index.
#[derive(Debug, Default)]
pub struct TimetableStore {
    trains: Vec<Arc<Train>>,
    by_id: HashMap<String, Arc<Train>>,
    by_station: HashMap<StationName, Vec<Arc<Train>>>,
}

impl TimetableStore {
    /// Build the store and its station index.
    ///
    /// Trains keep their input order within each station's list, so
    /// searches over the same store are deterministic.
    ///
    /// # Errors
    ///
    /// Returns `Err` if two trains share an id.
    pub fn from_trains(trains: Vec<Train>) -> Result<Self, TimetableError> {
        let mut store = Self::default();

        for train in trains {
            let train = Arc::new(train);
            if store.by_id.contains_key(train.id()) {
                return Err(TimetableError::DuplicateTrainId(train.id().to_string()));
            }
            store.by_id.insert(train.id().to_string(), train.clone());

            for station in train.stations() {
                store
                    .by_station
                    .entry(station.clone())
                    .or_default()
                    .push(train.clone());
            }
            store.trains.push(train);
        }

        Ok(store)
    }

    /// Trains calling at a station. Unknown stations have none.
    pub fn trains_at(&self, station: &StationName) -> &[Arc<Train>] {
        self.by_station
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks up a train by id.
    pub fn train(&self, id: &str) -> Option<&Arc<Train>> {
        self.by_id.get(id)
    }

    /// All trains in load order.
    pub fn trains(&self) -> &[Arc<Train>] {
        &self.trains
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Every station served, sorted by normalized name.
    pub fn all_stations(&self) -> Vec<&StationName> {
        self.by_station
            .keys()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Stations served by trains of one region, sorted by normalized name.
    pub fn stations_in(&self, region: Region) -> Vec<&StationName> {
        self.trains
            .iter()
            .filter(|t| t.region() == region)
            .flat_map(|t| t.stations())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolve free-form user input to a known station.
    pub fn find_station(&self, name: &str) -> Option<&StationName> {
        let wanted = StationName::parse(name).ok()?;
        self.by_station
            .get_key_value(&wanted)
            .map(|(station, _)| station)
    }
}
