//! Itinerary ranking for search results.

use chrono::Duration;

use crate::domain::Itinerary;

/// Rank itineraries by preference.
///
/// Itineraries are ranked by:
/// 1. Number of distinct trains used, minus one (fewer is better)
/// 2. Total duration from the requested time (shorter is better)
///
/// The sort is stable, so ties keep the order in which the search found
/// them. Returns itineraries sorted best-first.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(|a, b| {
        let changes_cmp = changes(a).cmp(&changes(b));
        if changes_cmp != std::cmp::Ordering::Equal {
            return changes_cmp;
        }

        a.total_duration().cmp(&b.total_duration())
    });

    itineraries
}

fn changes(itinerary: &Itinerary) -> usize {
    itinerary.distinct_trains().saturating_sub(1)
}

/// Drop itineraries that take longer than the fastest by more than
/// `tolerance`. Order is preserved.
pub fn within_tolerance(itineraries: Vec<Itinerary>, tolerance: Duration) -> Vec<Itinerary> {
    let Some(fastest) = itineraries.iter().map(Itinerary::total_duration).min() else {
        return itineraries;
    };

    itineraries
        .into_iter()
        .filter(|it| it.total_duration() - fastest <= tolerance)
        .collect()
}
