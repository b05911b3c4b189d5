//! Domain types for the commuter rail planner.
//!
//! This module contains the core domain model types that represent
//! validated timetable data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod error;
mod itinerary;
mod leg;
mod line;
mod station;
mod time;
mod train;

pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::Leg;
pub use line::{
    Direction, Line, Region, UnknownVariant, classify_direction, classify_line, classify_region,
};
pub use station::{InvalidStationName, StationName, normalize};
pub use time::{RailTime, ServiceTime, TimeError, resolve_rollover};
pub use train::{StopIndex, Train};
