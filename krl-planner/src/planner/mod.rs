//! Route planner using breadth-first search.
//!
//! This module answers: "I am at this station at this time - which trains
//! get me to my destination, and where do I change?"
//!
//! The search explores one-hop rides on every train calling at a station,
//! allowing changes only at registered interchanges, and ranks what it
//! finds by number of changes and total duration.

mod cancel;
mod config;
mod interchange;
mod rank;
mod search;


pub use cancel::{CancelOnDrop, CancelToken};
pub use config::SearchConfig;
pub use interchange::InterchangeRules;
pub use rank::{rank_itineraries, within_tolerance};
pub use search::{
    RouteSearchEngine, SearchError, SearchRequest, SearchResult, TrainProvider,
};
