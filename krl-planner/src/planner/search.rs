//! Breadth-first itinerary search.
//!
//! Finds routes from a start station to a destination over a fixed
//! timetable. Each state is a station reached at some time on some train;
//! expanding a state boards every train calling there and rides it to each
//! later stop in one hop.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, NaiveDate};
use tracing::{debug, trace, warn};

use crate::domain::{
    Itinerary, Leg, RailTime, Region, ServiceTime, StationName, StopIndex, Train,
};
use crate::occupancy::OccupancyModel;
use crate::timetable::TimetableStore;

use super::cancel::CancelToken;
use super::config::SearchConfig;
use super::interchange::InterchangeRules;
use super::rank::{rank_itineraries, within_tolerance};

/// Error from route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Too many states explored
    #[error("search budget exhausted after {explored} states")]
    BudgetExhausted { explored: usize },

    /// Search ran past its wall-clock budget
    #[error("search timed out")]
    Timeout,

    #[error("search cancelled")]
    Cancelled,
}

impl SearchError {
    /// True when the search stopped before it could finish, as opposed to
    /// rejecting its input.
    pub fn is_incomplete(&self) -> bool {
        !matches!(self, SearchError::InvalidRequest(_))
    }
}

/// Request for route search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub start: StationName,

    pub destination: StationName,

    /// Earliest time the traveller can board.
    pub depart_after: RailTime,

    /// Maximum number of train changes.
    pub max_transfers: usize,

    /// When set, only trains in this region are considered.
    pub region: Option<Region>,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        start: StationName,
        destination: StationName,
        depart_after: RailTime,
        max_transfers: usize,
    ) -> Self {
        Self {
            start,
            destination,
            depart_after,
            max_transfers,
            region: None,
        }
    }

    /// Restrict the search to trains in one region.
    pub fn in_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.start == self.destination {
            return Err(SearchError::InvalidRequest(format!(
                "start and destination are both {}",
                self.start
            )));
        }
        Ok(())
    }
}

/// Result of route search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Found itineraries, ranked best-first.
    pub itineraries: Vec<Itinerary>,

    /// Number of states expanded during search.
    pub states_explored: usize,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            itineraries: Vec::new(),
            states_explored: 0,
        }
    }
}

/// Source of the trains calling at a station.
///
/// This abstraction allows the engine to be tested with mock data.
pub trait TrainProvider {
    /// Trains calling at `station`. Unknown stations have none.
    fn trains_at(&self, station: &StationName) -> &[Arc<Train>];
}

impl TrainProvider for TimetableStore {
    fn trains_at(&self, station: &StationName) -> &[Arc<Train>] {
        TimetableStore::trains_at(self, station)
    }
}

/// Identifies a state for revisit suppression.
type VisitKey = (StationName, Option<String>, usize);

/// BFS state during search.
#[derive(Debug, Clone)]
struct SearchState {
    /// Current station.
    station: StationName,

    /// Earliest time another train may be boarded here.
    ready_at: RailTime,

    /// Legs ridden so far.
    legs: Vec<Leg>,

    /// Number of train changes made.
    transfers: usize,
}

impl SearchState {
    fn initial(request: &SearchRequest) -> Self {
        Self {
            station: request.start.clone(),
            ready_at: request.depart_after,
            legs: Vec::new(),
            transfers: 0,
        }
    }

    /// The train ridden into this station, if any.
    fn last_train(&self) -> Option<&Arc<Train>> {
        self.legs.last().map(Leg::train)
    }

    fn key(&self) -> VisitKey {
        (
            self.station.clone(),
            self.last_train().map(|t| t.id().to_string()),
            self.transfers,
        )
    }
}

/// Everything one state expansion produced.
#[derive(Debug)]
struct Expansion {
    next: Vec<SearchState>,
    found: Vec<Itinerary>,
    /// Best total duration known after this expansion.
    best: Option<Duration>,
}

/// Route search engine over a read-only timetable.
pub struct RouteSearchEngine<'a, P: TrainProvider> {
    provider: &'a P,
    interchanges: &'a InterchangeRules,
    occupancy: &'a OccupancyModel,
    config: &'a SearchConfig,
}

impl<'a, P: TrainProvider> RouteSearchEngine<'a, P> {
    /// Create a new engine.
    pub fn new(
        provider: &'a P,
        interchanges: &'a InterchangeRules,
        occupancy: &'a OccupancyModel,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            provider,
            interchanges,
            occupancy,
            config,
        }
    }

    /// Search for itineraries from start to destination.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        self.search_with_cancel(request, &CancelToken::new())
    }

    /// Search, stopping early if `cancel` is triggered.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if start and destination are the same station.
    /// `BudgetExhausted`, `Timeout` or `Cancelled` if the search stopped
    /// before exploring every state; these never mean "no route".
    pub fn search_with_cancel(
        &self,
        request: &SearchRequest,
        cancel: &CancelToken,
    ) -> Result<SearchResult, SearchError> {
        request.validate()?;

        let started = Instant::now();
        let time_budget = self.config.time_budget();

        let mut queue: VecDeque<SearchState> = VecDeque::from([SearchState::initial(request)]);
        let mut visited: HashSet<VisitKey> = HashSet::new();
        let mut found = Vec::new();
        let mut best = None;
        let mut explored = 0;

        while let Some(state) = queue.pop_front() {
            if cancel.is_cancelled() {
                debug!(explored, "search cancelled");
                return Err(SearchError::Cancelled);
            }
            if started.elapsed() >= time_budget {
                warn!(explored, budget_ms = self.config.time_budget_ms, "search timed out");
                return Err(SearchError::Timeout);
            }

            if !visited.insert(state.key()) {
                continue;
            }
            if explored >= self.config.max_expansions {
                warn!(explored, "search budget exhausted");
                return Err(SearchError::BudgetExhausted { explored });
            }
            explored += 1;

            trace!(
                station = %state.station,
                transfers = state.transfers,
                ready_at = %state.ready_at,
                "expanding state"
            );

            let expansion = self.expand(request, &state, best);
            best = expansion.best;
            found.extend(expansion.found);
            queue.extend(expansion.next);
        }

        debug!(
            start = %request.start,
            destination = %request.destination,
            explored,
            found = found.len(),
            "search complete"
        );

        let mut itineraries = rank_itineraries(found);
        if let Some(tolerance) = self.config.tolerance() {
            itineraries = within_tolerance(itineraries, tolerance);
        }
        itineraries.truncate(self.config.max_results);

        Ok(SearchResult {
            itineraries,
            states_explored: explored,
        })
    }

    /// Board every eligible train at the state's station.
    ///
    /// `best` is the shortest total duration of any itinerary found so far;
    /// candidates taking longer are dropped. The returned expansion carries
    /// the updated best.
    fn expand(
        &self,
        request: &SearchRequest,
        state: &SearchState,
        mut best: Option<Duration>,
    ) -> Expansion {
        let mut next = Vec::new();
        let mut found = Vec::new();

        for train in self.provider.trains_at(&state.station) {
            if request.region.is_some_and(|region| train.region() != region) {
                continue;
            }

            let transfers = match state.last_train() {
                None => state.transfers,
                // Staying on is covered by the hops from the original boarding
                Some(prev) if prev.id() == train.id() => continue,
                Some(prev) => {
                    if !self
                        .interchanges
                        .allows(&state.station, prev.line(), train.line())
                    {
                        trace!(
                            station = %state.station,
                            from = %prev.id(),
                            to = %train.id(),
                            "change not allowed"
                        );
                        continue;
                    }
                    state.transfers + 1
                }
            };
            if transfers > request.max_transfers {
                continue;
            }

            let Some(board) = train.index_of(&state.station) else {
                continue;
            };
            let Some(boarding) = train.time_at(board) else {
                continue;
            };
            let Some((service_date, departure)) =
                service_dates(request.depart_after.date(), boarding)
                    .filter_map(|date| Some((date, boarding.on(date)?)))
                    .filter(|(_, departure)| *departure >= state.ready_at)
                    .min_by_key(|(_, departure)| *departure)
            else {
                continue;
            };

            let occupancy = self.occupancy.predict(train, departure).get(&state.station);

            for alight in (board.0 + 1)..train.len() {
                // Stops without a time cannot be alighted at
                let Ok(leg) = Leg::new(Arc::clone(train), board, StopIndex(alight), service_date)
                else {
                    continue;
                };

                let duration = leg.arrival_time().signed_duration_since(request.depart_after);
                if best.is_some_and(|b| duration > b) {
                    continue;
                }

                let leg = leg.with_occupancy(occupancy);
                let reached = leg.destination().clone();
                let arrival = leg.arrival_time();
                let mut legs = state.legs.clone();
                legs.push(leg);

                if reached == request.destination {
                    match Itinerary::new(legs, request.depart_after) {
                        Ok(itinerary) => {
                            best = Some(best.map_or(duration, |b| b.min(duration)));
                            found.push(itinerary);
                        }
                        Err(e) => trace!(error = %e, "discarding itinerary"),
                    }
                    continue;
                }

                let Some(ready_at) = arrival.checked_add(self.config.transfer_buffer()) else {
                    continue;
                };
                next.push(SearchState {
                    station: reached,
                    ready_at,
                    legs,
                    transfers,
                });
            }
        }

        Expansion { next, found, best }
    }
}

/// Service days on which a stop time could fall on or after `date`.
///
/// A stop past midnight belongs to a run that started the day before, so
/// that run is a candidate as well as the one starting on `date`.
fn service_dates(date: NaiveDate, boarding: ServiceTime) -> impl Iterator<Item = NaiveDate> {
    let previous = if boarding.day_offset() > 0 {
        date.pred_opt()
    } else {
        None
    };
    previous.into_iter().chain(std::iter::once(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Line, ServiceTime};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn time(s: &str) -> RailTime {
        RailTime::parse_hhmm(s, date()).unwrap()
    }

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn make_train(id: &str, stops: &[(&str, &str)]) -> Train {
        let stops = stops
            .iter()
            .map(|(station, t)| (name(station), ServiceTime::parse_hhmm(t).ok()))
            .collect();
        Train::new(id, id, stops).unwrap()
    }

    fn store(trains: Vec<Train>) -> TimetableStore {
        TimetableStore::from_trains(trains).unwrap()
    }

    #[test]
    fn start_equal_to_destination_is_invalid() {
        let request = SearchRequest::new(name("Bogor"), name("BOGOR"), time("08:00"), 2);
        assert!(matches!(
            request.validate(),
            Err(SearchError::InvalidRequest(_))
        ));
    }

    #[test]
    fn incomplete_outcomes() {
        assert!(SearchError::Timeout.is_incomplete());
        assert!(SearchError::Cancelled.is_incomplete());
        assert!(SearchError::BudgetExhausted { explored: 3 }.is_incomplete());
        assert!(!SearchError::InvalidRequest("x".into()).is_incomplete());
    }

    #[test]
    fn expand_rides_to_every_later_stop() {
        let provider = store(vec![make_train(
            "T1",
            &[("Bogor", "08:00"), ("Depok", "08:25"), ("Manggarai", "08:50")],
        )]);
        let rules = InterchangeRules::new();
        let model = OccupancyModel::default();
        let config = SearchConfig::default();
        let engine = RouteSearchEngine::new(&provider, &rules, &model, &config);

        let request = SearchRequest::new(name("Bogor"), name("Jakarta Kota"), time("07:30"), 1);
        let expansion = engine.expand(&request, &SearchState::initial(&request), None);

        assert!(expansion.found.is_empty());
        assert_eq!(expansion.best, None);
        let stations: Vec<_> = expansion.next.iter().map(|s| s.station.key()).collect();
        assert_eq!(stations, vec!["depok", "manggarai"]);
        // Arrival plus the transfer buffer
        assert_eq!(expansion.next[0].ready_at, time("08:27"));
        assert!(expansion.next.iter().all(|s| s.transfers == 0));
    }

    #[test]
    fn expand_prunes_against_best() {
        let provider = store(vec![make_train(
            "T1",
            &[("Bogor", "08:00"), ("Depok", "08:25"), ("Manggarai", "08:50")],
        )]);
        let rules = InterchangeRules::new();
        let model = OccupancyModel::default();
        let config = SearchConfig::default();
        let engine = RouteSearchEngine::new(&provider, &rules, &model, &config);

        let request = SearchRequest::new(name("Bogor"), name("Manggarai"), time("07:30"), 1);
        let initial = SearchState::initial(&request);

        // A best of 60 minutes leaves only Depok (55 minutes) reachable
        let expansion = engine.expand(&request, &initial, Some(Duration::minutes(60)));
        assert!(expansion.found.is_empty());
        assert_eq!(expansion.next.len(), 1);
        assert_eq!(expansion.best, Some(Duration::minutes(60)));

        // With no bound the destination is found and becomes the new best
        let expansion = engine.expand(&request, &initial, None);
        assert_eq!(expansion.found.len(), 1);
        assert_eq!(expansion.best, Some(Duration::minutes(80)));
    }

    #[test]
    fn expand_skips_departed_trains() {
        let provider = store(vec![
            make_train("EARLY", &[("Bogor", "07:00"), ("Depok", "07:25")]),
            make_train("LATE", &[("Bogor", "08:00"), ("Depok", "08:25")]),
        ]);
        let rules = InterchangeRules::new();
        let model = OccupancyModel::default();
        let config = SearchConfig::default();
        let engine = RouteSearchEngine::new(&provider, &rules, &model, &config);

        let request = SearchRequest::new(name("Bogor"), name("Depok"), time("07:30"), 0);
        let expansion = engine.expand(&request, &SearchState::initial(&request), None);
        assert_eq!(expansion.found.len(), 1);
        assert_eq!(expansion.found[0].first_leg().train_id(), "LATE");
    }

    #[test]
    fn expand_checks_interchange_lines() {
        let bogor_line = make_train("B1", &[("Bogor", "08:00"), ("Manggarai", "08:50")]);
        let cikarang_line = make_train("C1", &[("Manggarai", "09:00"), ("Bekasi", "09:30")]);
        assert_eq!(bogor_line.line(), Line::Bogor);
        assert_eq!(cikarang_line.line(), Line::Cikarang);

        let provider = store(vec![bogor_line, cikarang_line]);
        let model = OccupancyModel::default();
        let config = SearchConfig::default();
        let request = SearchRequest::new(name("Bogor"), name("Bekasi"), time("07:30"), 1);

        let initial = SearchState::initial(&request);
        let open = InterchangeRules::jabodetabek();
        let engine = RouteSearchEngine::new(&provider, &open, &model, &config);
        let first = engine.expand(&request, &initial, None);
        let at_manggarai = &first.next[0];

        let expansion = engine.expand(&request, at_manggarai, None);
        assert_eq!(expansion.found.len(), 1);
        assert_eq!(expansion.found[0].transfer_count(), 1);

        let closed = InterchangeRules::new().with_station("Manggarai", [Line::Bogor]);
        let engine = RouteSearchEngine::new(&provider, &closed, &model, &config);
        let expansion = engine.expand(&request, at_manggarai, None);
        assert!(expansion.found.is_empty());
        assert!(expansion.next.is_empty());
    }
}
