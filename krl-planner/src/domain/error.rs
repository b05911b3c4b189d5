//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from loader and search errors.

use super::StationName;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A train must call at at least one station
    #[error("train route has no stops")]
    EmptyRoute,

    /// A train calls at the same station twice
    #[error("station {0} appears more than once in the route")]
    DuplicateStop(StationName),

    /// Stop times go backwards along the route
    #[error("schedule goes backwards at {station}")]
    NonMonotonicSchedule { station: StationName },

    /// Stop index is out of bounds for the train
    #[error("invalid stop index: out of bounds")]
    InvalidStopIndex,

    /// Invalid leg construction (e.g., alight before board)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Missing required time data for an operation
    #[error("missing required time data: {0}")]
    MissingTime(String),

    /// Consecutive legs don't share a station
    #[error("leg ending at {0} does not connect to leg starting at {1}")]
    LegsNotConnected(StationName, StationName),

    /// A leg departs before the previous one arrives
    #[error("connection at {station} departs before arrival")]
    ConnectionTooTight { station: StationName },

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,
}
