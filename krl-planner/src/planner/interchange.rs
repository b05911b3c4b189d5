//! Stations where travellers may change between lines.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Line, StationName, normalize};

/// Table of interchange stations and the lines that may be joined at each.
///
/// A train change at any station not in the table, or between lines not
/// both listed for the station, is not allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterchangeRules {
    stations: HashMap<String, BTreeSet<Line>>,
}

impl InterchangeRules {
    /// An empty table: no changes allowed anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station and the lines that meet there.
    ///
    /// Registering the same station again adds to its lines.
    pub fn with_station(mut self, station: &str, lines: impl IntoIterator<Item = Line>) -> Self {
        self.stations
            .entry(normalize(station))
            .or_default()
            .extend(lines);
        self
    }

    /// The Jabodetabek interchange table.
    pub fn jabodetabek() -> Self {
        Self::new()
            .with_station("Manggarai", [Line::Bogor, Line::Cikarang])
            .with_station("Tanah Abang", [Line::Cikarang, Line::Rangkasbitung])
            .with_station("Duri", [Line::Cikarang, Line::Tangerang])
            .with_station("Kampung Bandan", [Line::Cikarang, Line::TanjungPriok])
            .with_station("Jakarta Kota", [Line::Bogor, Line::TanjungPriok])
    }

    pub fn is_interchange(&self, station: &StationName) -> bool {
        self.stations.contains_key(station.key())
    }

    /// Lines that meet at a station, if it is an interchange.
    pub fn lines_at(&self, station: &StationName) -> Option<&BTreeSet<Line>> {
        self.stations.get(station.key())
    }

    /// Whether a traveller may leave a `from` train for a `to` train at
    /// `station`.
    pub fn allows(&self, station: &StationName, from: Line, to: Line) -> bool {
        self.lines_at(station)
            .is_some_and(|lines| lines.contains(&from) && lines.contains(&to))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
