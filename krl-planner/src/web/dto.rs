//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, Leg, Train};
use crate::occupancy::OccupancyMap;
use crate::planner::SearchResult;

/// Default number of changes allowed when a plan request does not say.
pub const DEFAULT_MAX_TRANSFERS: usize = 2;

/// Query for the station list.
#[derive(Debug, Deserialize)]
pub struct StationsQuery {
    /// Optional region filter (e.g. "jabodetabek")
    pub region: Option<String>,
}

/// Response for the station list.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    /// Station display names, sorted
    pub stations: Vec<String>,
}

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    /// Station to start from
    pub start: String,

    /// Station to reach
    pub destination: String,

    /// "YYYY-MM-DDTHH:MM" or "HH:MM" today (defaults to now)
    pub time: Option<String>,

    /// Maximum number of changes
    pub max_transfers: Option<usize>,

    /// Optional region filter
    pub region: Option<String>,
}

/// A train leg in an itinerary.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub train_id: String,

    pub train_name: String,

    /// Boarding station
    pub origin: String,

    /// Alighting station
    pub destination: String,

    /// Departure time (HH:MM)
    pub departure: String,

    /// Arrival time (HH:MM)
    pub arrival: String,

    /// Predicted occupancy percent when boarding
    pub occupancy: Option<u8>,
}

/// An itinerary option.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    pub legs: Vec<LegResult>,

    /// Departure time from the start station
    pub departure: String,

    /// Arrival time at the destination
    pub arrival: String,

    /// Minutes from the requested time to arrival
    pub duration_mins: i64,

    /// Number of changes
    pub transfers: usize,
}

/// Response for journey planning.
#[derive(Debug, Serialize)]
pub struct PlanJourneyResponse {
    /// Found itineraries, best first
    pub itineraries: Vec<ItineraryResult>,

    /// Number of search states explored
    pub states_explored: usize,
}

/// Query for a train's occupancy.
#[derive(Debug, Deserialize)]
pub struct OccupancyQuery {
    /// "YYYY-MM-DDTHH:MM" or "HH:MM" today (defaults to now)
    pub time: Option<String>,
}

/// Occupancy at one stop.
#[derive(Debug, Serialize)]
pub struct StationOccupancy {
    pub station: String,

    /// Percent of capacity, 0 to 100
    pub occupancy: u8,
}

/// Response for a train's occupancy.
#[derive(Debug, Serialize)]
pub struct TrainOccupancyResponse {
    pub train_id: String,

    pub train_name: String,

    pub line: String,

    pub direction: String,

    /// Name of the estimator that produced the figures
    pub estimator: String,

    /// Per-stop occupancy in route order
    pub stations: Vec<StationOccupancy>,

    /// Trust in the estimate, 0.0 to 1.0
    pub confidence: f64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl LegResult {
    /// Create from a domain Leg.
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            train_id: leg.train_id().to_string(),
            train_name: leg.train().name().to_string(),
            origin: leg.origin().display().to_string(),
            destination: leg.destination().display().to_string(),
            departure: leg.departure_time().to_string(),
            arrival: leg.arrival_time().to_string(),
            occupancy: leg.occupancy(),
        }
    }
}

impl ItineraryResult {
    /// Create from a domain Itinerary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            legs: itinerary.legs().iter().map(LegResult::from_leg).collect(),
            departure: itinerary.departure_time().to_string(),
            arrival: itinerary.arrival_time().to_string(),
            duration_mins: itinerary.total_duration().num_minutes(),
            transfers: itinerary.transfer_count(),
        }
    }
}

impl PlanJourneyResponse {
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            itineraries: result
                .itineraries
                .iter()
                .map(ItineraryResult::from_itinerary)
                .collect(),
            states_explored: result.states_explored,
        }
    }
}

impl TrainOccupancyResponse {
    pub fn new(train: &Train, estimator: &str, map: &OccupancyMap) -> Self {
        let stations = map
            .iter()
            .map(|(station, occupancy)| StationOccupancy {
                station: station.display().to_string(),
                occupancy,
            })
            .collect();

        Self {
            train_id: train.id().to_string(),
            train_name: train.name().to_string(),
            line: train.line().to_string(),
            direction: train.direction().to_string(),
            estimator: estimator.to_string(),
            stations,
            confidence: map.confidence(),
        }
    }
}
