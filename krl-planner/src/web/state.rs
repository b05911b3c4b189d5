//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, PlanCache};
use crate::occupancy::OccupancyModel;
use crate::planner::{InterchangeRules, SearchConfig};
use crate::timetable::TimetableStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Loaded timetable
    pub timetable: Arc<TimetableStore>,

    /// Stations where changing trains is allowed
    pub interchanges: Arc<InterchangeRules>,

    /// Occupancy estimator
    pub occupancy: OccupancyModel,

    /// Route search configuration
    pub config: Arc<SearchConfig>,

    /// Recently computed plans
    pub cache: Arc<PlanCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        timetable: TimetableStore,
        interchanges: InterchangeRules,
        occupancy: OccupancyModel,
        config: SearchConfig,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            timetable: Arc::new(timetable),
            interchanges: Arc::new(interchanges),
            occupancy,
            config: Arc::new(config),
            cache: Arc::new(PlanCache::new(cache)),
        }
    }
}
