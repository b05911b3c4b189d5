//! Caching layer for plan results.
//!
//! The timetable never changes while the server runs, so a search is a pure
//! function of its request. Results are cached by request; the reference
//! time is floored to a bucket so requests made within the same bucket
//! share one search.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use moka::future::Cache as MokaCache;

use crate::domain::{RailTime, Region};
use crate::planner::{SearchRequest, SearchResult};

/// Cache key for plans: (start key, destination key, date, time bucket,
/// max transfers, region filter).
type PlanKey = (String, String, NaiveDate, u16, usize, Option<Region>);

/// Cached plan entry.
type PlanEntry = Arc<SearchResult>;

/// Configuration for the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// Time bucket size in minutes.
    pub bucket_mins: u16,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
            bucket_mins: 1,
        }
    }
}

/// Cache for search results.
pub struct PlanCache {
    plans: MokaCache<PlanKey, PlanEntry>,

    /// Time bucket size in minutes.
    bucket_mins: u16,
}

impl PlanCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let plans = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            plans,
            bucket_mins: config.bucket_mins.max(1),
        }
    }

    /// Bucket number of a time of day.
    fn time_bucket(&self, at: RailTime) -> u16 {
        let mins = (at.hour() * 60 + at.minute()) as u16;
        mins / self.bucket_mins
    }

    /// Floor a reference time to the start of its bucket.
    ///
    /// Searches should run from the floored time so that every request in
    /// a bucket gets the same answer.
    pub fn bucket_start(&self, at: RailTime) -> RailTime {
        let mins = u32::from(self.time_bucket(at) * self.bucket_mins);
        let time = NaiveTime::from_hms_opt(mins / 60, mins % 60, 0).unwrap_or(at.time());
        RailTime::new(at.date(), time)
    }

    fn key(&self, request: &SearchRequest) -> PlanKey {
        (
            request.start.key().to_string(),
            request.destination.key().to_string(),
            request.depart_after.date(),
            self.time_bucket(request.depart_after),
            request.max_transfers,
            request.region,
        )
    }

    /// Get a cached plan for a request.
    pub async fn get(&self, request: &SearchRequest) -> Option<PlanEntry> {
        self.plans.get(&self.key(request)).await
    }

    /// Insert a plan into the cache.
    pub async fn insert(&self, request: &SearchRequest, entry: PlanEntry) {
        self.plans.insert(self.key(request), entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.plans.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.plans.invalidate_all();
    }
}
