//! Station name types.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Error returned when a station name is empty after normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// Normalize a station name into its identity key.
///
/// Trims, lowercases and collapses internal runs of whitespace into a
/// single space, so `"  Jakarta   Kota "` and `"jakarta kota"` compare equal.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A station, identified by its normalized name.
///
/// The display form is kept as first seen in the timetable so responses can
/// echo the operator's spelling, but equality, hashing and ordering only look
/// at the normalized key.
///
/// # Examples
///
/// ```
/// use krl_planner::domain::StationName;
///
/// let a = StationName::parse("Jakarta  Kota").unwrap();
/// let b = StationName::parse("JAKARTA KOTA").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.key(), "jakarta kota");
/// assert_eq!(a.to_string(), "Jakarta  Kota");
///
/// assert!(StationName::parse("   ").is_err());
/// ```
#[derive(Clone)]
pub struct StationName {
    key: String,
    display: String,
}

impl StationName {
    /// Parse a station name, rejecting names that are blank.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        let key = normalize(s);
        if key.is_empty() {
            return Err(InvalidStationName {
                reason: "must contain at least one non-whitespace character",
            });
        }

        Ok(Self {
            key,
            display: s.trim().to_string(),
        })
    }

    /// Returns the normalized identity key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the name as written in the source data.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Returns true if the normalized name contains `needle`.
    ///
    /// `needle` is expected to be normalized already.
    pub fn contains(&self, needle: &str) -> bool {
        self.key.contains(needle)
    }
}

impl PartialEq for StationName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for StationName {}

impl Hash for StationName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for StationName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for StationName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.key)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Tanah   Abang "), "tanah abang");
        assert_eq!(normalize("MANGGARAI"), "manggarai");
        assert_eq!(normalize("\tDuri\n"), "duri");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn blank_names_rejected() {
        assert!(StationName::parse("").is_err());
        assert!(StationName::parse(" \t ").is_err());
    }

    #[test]
    fn identity_ignores_spelling() {
        let a = StationName::parse("Pasar  Minggu").unwrap();
        let b = StationName::parse("pasar minggu").unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));

        // Display keeps the first spelling (trimmed only)
        assert_eq!(a.display(), "Pasar  Minggu");
    }

    #[test]
    fn ordering_follows_key() {
        let mut names: Vec<StationName> = ["depok", "Bogor", "Cikini"]
            .iter()
            .map(|s| StationName::parse(s).unwrap())
            .collect();
        names.sort();
        let keys: Vec<&str> = names.iter().map(|n| n.key()).collect();
        assert_eq!(keys, vec!["bogor", "cikini", "depok"]);
    }

    #[test]
    fn contains_matches_substring() {
        let name = StationName::parse("Jakarta Kota").unwrap();
        assert!(name.contains("jakarta"));
        assert!(!name.contains("bogor"));
    }
}
