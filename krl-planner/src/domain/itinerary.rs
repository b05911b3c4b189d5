//! Itinerary type.
//!
//! An `Itinerary` is a complete trip from start to destination as a chain
//! of train legs.

use std::collections::HashSet;

use chrono::Duration;

use super::{DomainError, Leg, RailTime, StationName};

/// A complete itinerary from start to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = origin of next)
/// - Each leg departs no earlier than the previous leg arrives
#[derive(Debug, Clone)]
pub struct Itinerary {
    legs: Vec<Leg>,
    requested_at: RailTime,
}

impl Itinerary {
    /// Construct an itinerary from legs in travel order.
    ///
    /// `requested_at` is the time the traveller asked to leave from; the
    /// total duration is measured from it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list is empty, if consecutive legs don't share a
    /// station, or if a leg departs before the previous one arrives.
    pub fn new(legs: Vec<Leg>, requested_at: RailTime) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for window in legs.windows(2) {
            let (prev, next) = (&window[0], &window[1]);
            if prev.destination() != next.origin() {
                return Err(DomainError::LegsNotConnected(
                    prev.destination().clone(),
                    next.origin().clone(),
                ));
            }
            if prev.arrival_time() > next.departure_time() {
                return Err(DomainError::ConnectionTooTight {
                    station: next.origin().clone(),
                });
            }
        }

        Ok(Itinerary { legs, requested_at })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the first leg.
    pub fn first_leg(&self) -> &Leg {
        // Safe: validated non-empty at construction
        &self.legs[0]
    }

    /// Returns the last leg.
    pub fn last_leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    pub fn origin(&self) -> &StationName {
        self.first_leg().origin()
    }

    pub fn destination(&self) -> &StationName {
        self.last_leg().destination()
    }

    /// The time the search was asked to start from.
    pub fn requested_at(&self) -> RailTime {
        self.requested_at
    }

    pub fn departure_time(&self) -> RailTime {
        self.first_leg().departure_time()
    }

    pub fn arrival_time(&self) -> RailTime {
        self.last_leg().arrival_time()
    }

    /// Time from the requested start time to arrival, including the
    /// initial wait on the platform.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time().signed_duration_since(self.requested_at)
    }

    /// Time from boarding the first train to arrival.
    pub fn travel_duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Number of distinct trains used.
    pub fn distinct_trains(&self) -> usize {
        self.legs
            .iter()
            .map(|leg| leg.train_id())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of train-id changes between consecutive legs.
    pub fn transfer_count(&self) -> usize {
        self.legs
            .windows(2)
            .filter(|w| w[0].train_id() != w[1].train_id())
            .count()
    }

    /// Stations where the traveller changes train.
    pub fn transfer_stations(&self) -> impl Iterator<Item = &StationName> {
        self.legs
            .windows(2)
            .filter(|w| w[0].train_id() != w[1].train_id())
            .map(|w| w[1].origin())
    }
}
