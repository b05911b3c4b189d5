//! Train leg type.
//!
//! A `Leg` is one continuous ride on a single train. It holds an
//! `Arc<Train>` so cloning during search is cheap.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use super::{DomainError, RailTime, StationName, StopIndex, Train};

/// A leg of an itinerary (one train).
///
/// Times are resolved at construction so `departure_time()` and
/// `arrival_time()` never fail.
///
/// # Invariants
///
/// - `alight > board` (must travel forward on the train)
/// - Both indices are valid for the train
/// - Both stops have a scheduled time
#[derive(Debug, Clone)]
pub struct Leg {
    train: Arc<Train>,
    board: StopIndex,
    alight: StopIndex,
    departure: RailTime,
    arrival: RailTime,
    occupancy: Option<u8>,
}

impl Leg {
    /// Construct a leg on the train's run that starts on `service_date`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `alight <= board`
    /// - Either index is out of bounds
    /// - Either stop has no scheduled time
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chrono::NaiveDate;
    /// use krl_planner::domain::{Leg, ServiceTime, StationName, StopIndex, Train};
    ///
    /// let stop = |name: &str, time: &str| {
    ///     (StationName::parse(name).unwrap(), ServiceTime::parse_hhmm(time).ok())
    /// };
    /// let train = Arc::new(
    ///     Train::new("T1", "Bogor Line", vec![stop("Bogor", "08:00"), stop("Manggarai", "08:50")])
    ///         .unwrap(),
    /// );
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    ///
    /// let leg = Leg::new(train, StopIndex(0), StopIndex(1), date).unwrap();
    /// assert_eq!(leg.departure_time().to_string(), "08:00");
    /// assert_eq!(leg.arrival_time().to_string(), "08:50");
    /// assert_eq!(leg.duration().num_minutes(), 50);
    /// ```
    pub fn new(
        train: Arc<Train>,
        board: StopIndex,
        alight: StopIndex,
        service_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if alight.0 <= board.0 {
            return Err(DomainError::InvalidLeg("alight index must be after board index"));
        }
        if alight.0 >= train.len() {
            return Err(DomainError::InvalidStopIndex);
        }

        let departure = train
            .time_at(board)
            .and_then(|t| t.on(service_date))
            .ok_or_else(|| DomainError::MissingTime("boarding departure".into()))?;
        let arrival = train
            .time_at(alight)
            .and_then(|t| t.on(service_date))
            .ok_or_else(|| DomainError::MissingTime("alighting arrival".into()))?;

        Ok(Leg {
            train,
            board,
            alight,
            departure,
            arrival,
            occupancy: None,
        })
    }

    /// Attach the predicted occupancy at the boarding station.
    pub fn with_occupancy(mut self, percent: Option<u8>) -> Self {
        self.occupancy = percent;
        self
    }

    /// Returns the train this leg is on.
    pub fn train(&self) -> &Arc<Train> {
        &self.train
    }

    pub fn train_id(&self) -> &str {
        self.train.id()
    }

    /// Returns the boarding station.
    pub fn origin(&self) -> &StationName {
        // Safe: validated at construction
        &self.train.stations()[self.board.0]
    }

    /// Returns the alighting station.
    pub fn destination(&self) -> &StationName {
        &self.train.stations()[self.alight.0]
    }

    pub fn departure_time(&self) -> RailTime {
        self.departure
    }

    pub fn arrival_time(&self) -> RailTime {
        self.arrival
    }

    /// Predicted occupancy percentage at the boarding station.
    pub fn occupancy(&self) -> Option<u8> {
        self.occupancy
    }

    /// Time spent on the train.
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }

    /// Number of stops passed, counting the alighting stop.
    pub fn stop_count(&self) -> usize {
        self.alight.0 - self.board.0
    }
}
