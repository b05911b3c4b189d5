//! Search configuration for the route planner.

use chrono::Duration;

/// Configuration parameters for route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Dwell added to every arrival before another train may be boarded
    /// (minutes).
    pub transfer_buffer_mins: i64,

    /// Maximum number of states taken off the queue before the search
    /// gives up.
    pub max_expansions: usize,

    /// Wall-clock budget for one search (milliseconds).
    pub time_budget_ms: u64,

    /// When set, drop itineraries that take longer than the best one by
    /// more than this many minutes.
    pub tolerance_mins: Option<i64>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_results: usize,
        transfer_buffer_mins: i64,
        max_expansions: usize,
        time_budget_ms: u64,
        tolerance_mins: Option<i64>,
    ) -> Self {
        Self {
            max_results,
            transfer_buffer_mins,
            max_expansions,
            time_budget_ms,
            tolerance_mins,
        }
    }

    /// Returns the transfer buffer as a Duration.
    pub fn transfer_buffer(&self) -> Duration {
        Duration::minutes(self.transfer_buffer_mins)
    }

    /// Returns the search time budget.
    pub fn time_budget(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.time_budget_ms)
    }

    /// Returns the result tolerance as a Duration, if one is set.
    pub fn tolerance(&self) -> Option<Duration> {
        self.tolerance_mins.map(Duration::minutes)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            transfer_buffer_mins: 2,
            max_expansions: 50_000,
            time_budget_ms: 2_000,
            tolerance_mins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.max_results, 3);
        assert_eq!(config.transfer_buffer_mins, 2);
        assert_eq!(config.max_expansions, 50_000);
        assert_eq!(config.time_budget_ms, 2_000);
        assert_eq!(config.tolerance_mins, None);
    }

    #[test]
    fn duration_methods() {
        let config = SearchConfig::default();

        assert_eq!(config.transfer_buffer(), Duration::minutes(2));
        assert_eq!(config.time_budget(), std::time::Duration::from_secs(2));
        assert_eq!(config.tolerance(), None);
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(1, 5, 100, 500, Some(30));

        assert_eq!(config.max_results, 1);
        assert_eq!(config.transfer_buffer(), Duration::minutes(5));
        assert_eq!(config.max_expansions, 100);
        assert_eq!(config.time_budget_ms, 500);
        assert_eq!(config.tolerance(), Some(Duration::minutes(30)));
    }
}
