//! Web layer for the commuter rail planner.
//!
//! Provides JSON endpoints for listing stations, planning itineraries and
//! estimating train occupancy.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
