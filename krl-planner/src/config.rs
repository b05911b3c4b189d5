//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::CacheConfig;
use crate::occupancy::EstimatorKind;
use crate::planner::SearchConfig;

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the timetable CSV.
    pub timetable_path: PathBuf,

    /// Address to listen on.
    pub bind: SocketAddr,

    /// Occupancy estimator for this deployment.
    pub estimator: EstimatorKind,

    pub search: SearchConfig,

    pub cache: CacheConfig,
}

impl AppConfig {
    pub const TIMETABLE: &'static str = "KRL_TIMETABLE";
    pub const BIND: &'static str = "KRL_BIND";
    pub const ESTIMATOR: &'static str = "KRL_ESTIMATOR";
    pub const MAX_RESULTS: &'static str = "KRL_MAX_RESULTS";
    pub const TRANSFER_BUFFER_MINS: &'static str = "KRL_TRANSFER_BUFFER_MINS";
    pub const SEARCH_BUDGET_MS: &'static str = "KRL_SEARCH_BUDGET_MS";

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Only `KRL_TIMETABLE` is required; everything else has a default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timetable_path = lookup(Self::TIMETABLE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(Self::TIMETABLE))?;

        let bind = parse_or(&lookup, Self::BIND, SocketAddr::from(([127, 0, 0, 1], 3000)))?;
        let estimator = parse_or(&lookup, Self::ESTIMATOR, EstimatorKind::default())?;

        let defaults = SearchConfig::default();
        let search = SearchConfig {
            max_results: parse_or(&lookup, Self::MAX_RESULTS, defaults.max_results)?,
            transfer_buffer_mins: parse_or(
                &lookup,
                Self::TRANSFER_BUFFER_MINS,
                defaults.transfer_buffer_mins,
            )?,
            time_budget_ms: parse_or(&lookup, Self::SEARCH_BUDGET_MS, defaults.time_budget_ms)?,
            ..defaults
        };

        Ok(Self {
            timetable_path,
            bind,
            estimator,
            search,
            cache: CacheConfig::default(),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
