//! CSV timetable loader.
//!
//! Each record after the header row has four fields:
//!
//! 1. train id
//! 2. display name
//! 3. comma-separated station names in calling order (quoted)
//! 4. comma-separated `station:HH:MM` tokens (quoted)
//!
//! A station with no time token is kept in the route with no time.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::domain::{ServiceTime, StationName, Train, normalize};

use super::{TimetableError, TimetableStore};

/// Errors loading a timetable file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record is well-formed CSV but not a valid train
    #[error("record {record}: {reason}")]
    Record { record: usize, reason: String },

    #[error(transparent)]
    Timetable(#[from] TimetableError),
}

/// One raw row, deserialized by position.
#[derive(Debug, Deserialize)]
struct TrainRecord {
    id: String,
    name: String,
    route: String,
    times: String,
}

/// Load a timetable from a CSV file on disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<TimetableStore, LoadError> {
    let file = File::open(path.as_ref())?;
    load_reader(file)
}

/// Load a timetable from any CSV source.
pub fn load_reader<R: Read>(reader: R) -> Result<TimetableStore, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut trains = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        let record_no = i + 1;
        let row = row?;
        let record: TrainRecord = row.deserialize(None)?;
        let train = parse_record(record).map_err(|reason| LoadError::Record {
            record: record_no,
            reason,
        })?;
        trace!(train = %train.id(), stops = train.len(), "loaded train");
        trains.push(train);
    }

    let store = TimetableStore::from_trains(trains)?;
    debug!(
        trains = store.len(),
        stations = store.all_stations().len(),
        "timetable loaded"
    );
    Ok(store)
}

fn parse_record(record: TrainRecord) -> Result<Train, String> {
    if record.id.is_empty() {
        return Err("train id is empty".to_string());
    }

    let times = parse_time_tokens(&record.times)?;

    let stops = record
        .route
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let station = StationName::parse(s).map_err(|e| e.to_string())?;
            let time = times.get(station.key()).copied();
            Ok((station, time))
        })
        .collect::<Result<Vec<_>, String>>()?;

    Train::new(record.id, record.name, stops).map_err(|e| e.to_string())
}

/// Parse `station:HH:MM` tokens into a map keyed by normalized station.
///
/// The last two colon-separated parts are the time; everything before them
/// is the station, so station names may themselves contain colons.
fn parse_time_tokens(field: &str) -> Result<HashMap<String, ServiceTime>, String> {
    let mut times = HashMap::new();

    for token in field.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let mut parts = token.rsplitn(3, ':');
        let (Some(minute), Some(hour), Some(station)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("time token {token:?} is not station:HH:MM"));
        };

        let key = normalize(station);
        if key.is_empty() {
            return Err(format!("time token {token:?} has no station"));
        }
        let time = ServiceTime::parse_hhmm(&format!("{}:{}", hour.trim(), minute.trim()))
            .map_err(|e| format!("time token {token:?}: {e}"))?;

        times.insert(key, time);
    }

    Ok(times)
}
