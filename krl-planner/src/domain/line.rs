//! Line, direction and region classification.
//!
//! Trains in the timetable carry no line or direction of their own; both are
//! inferred from the stations they call at. The signature tables below are
//! the whole of that inference: a line is recognised by the presence of any
//! of its signature stations, a direction by keywords in the train's
//! terminal stations.

use std::fmt;
use std::str::FromStr;

use super::StationName;

/// A rail corridor of the Jabodetabek network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Line {
    Bogor,
    Cikarang,
    Rangkasbitung,
    Tangerang,
    TanjungPriok,
    Unknown,
}

/// Signature stations per line, in classification priority order.
///
/// Order matters: the Cikarang loop passes through stations that other
/// lines also serve, so it is tested first.
const LINE_SIGNATURES: &[(Line, &[&str])] = &[
    (Line::Cikarang, &["bekasi", "cikarang", "tambun"]),
    (
        Line::Rangkasbitung,
        &["parung panjang", "serpong", "rangkasbitung", "kebayoran"],
    ),
    (Line::Tangerang, &["rawa buaya", "batu ceper", "tangerang"]),
    (Line::TanjungPriok, &["ancol", "tanjung priok"]),
    (Line::Bogor, &["depok", "citayam", "bogor", "tebet"]),
];

impl Line {
    /// All lines, `Unknown` last.
    pub const ALL: [Line; 6] = [
        Line::Bogor,
        Line::Cikarang,
        Line::Rangkasbitung,
        Line::Tangerang,
        Line::TanjungPriok,
        Line::Unknown,
    ];

    /// Returns the line's canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Line::Bogor => "bogor",
            Line::Cikarang => "cikarang",
            Line::Rangkasbitung => "rangkasbitung",
            Line::Tangerang => "tangerang",
            Line::TanjungPriok => "tanjung_priok",
            Line::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name matches no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for Line {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Line::ALL
            .into_iter()
            .find(|line| line.as_str() == wanted)
            .ok_or_else(|| UnknownVariant::new("line", s))
    }
}

/// Classify a stop sequence into a line.
///
/// The first line (in priority order) with a signature station anywhere in
/// the route wins.
///
/// # Examples
///
/// ```
/// use krl_planner::domain::{Line, StationName, classify_line};
///
/// let route: Vec<StationName> = ["Bogor", "Depok", "Manggarai"]
///     .iter()
///     .map(|s| StationName::parse(s).unwrap())
///     .collect();
/// assert_eq!(classify_line(&route), Line::Bogor);
/// ```
pub fn classify_line(stops: &[StationName]) -> Line {
    LINE_SIGNATURES
        .iter()
        .find(|(_, signature)| {
            stops
                .iter()
                .any(|stop| signature.contains(&stop.key()))
        })
        .map(|(line, _)| *line)
        .unwrap_or(Line::Unknown)
}

/// Travel direction relative to the Jakarta hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Terminating at one of the central Jakarta stations
    TowardJakarta,
    TowardBogor,
    TowardCikarang,
    TowardRangkasbitung,
    TowardTangerang,
    /// Shuttle service without a meaningful direction
    Bidirectional,
    Unknown,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TowardJakarta => "toward_jakarta",
            Direction::TowardBogor => "toward_bogor",
            Direction::TowardCikarang => "toward_cikarang",
            Direction::TowardRangkasbitung => "toward_rangkasbitung",
            Direction::TowardTangerang => "toward_tangerang",
            Direction::Bidirectional => "bidirectional",
            Direction::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminus that marks a shuttle, matched against either end of the route.
const SHUTTLE_TERMINI: &[&str] = &["tanjung priok"];

/// Keywords matched against the last stop, in priority order.
const DIRECTION_KEYWORDS: &[(Direction, &[&str])] = &[
    (
        Direction::TowardJakarta,
        &["jakarta", "duri", "angke", "tanah abang"],
    ),
    (Direction::TowardBogor, &["bogor", "nambo"]),
    (Direction::TowardCikarang, &["cikarang"]),
    (
        Direction::TowardRangkasbitung,
        &["rangkasbitung", "parung panjang", "serpong"],
    ),
    (Direction::TowardTangerang, &["tangerang"]),
];

/// Classify a stop sequence into a travel direction.
///
/// Routes with fewer than two stops have no direction.
pub fn classify_direction(stops: &[StationName]) -> Direction {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Direction::Unknown;
    };
    if stops.len() < 2 {
        return Direction::Unknown;
    }

    if SHUTTLE_TERMINI
        .iter()
        .any(|t| first.contains(t) || last.contains(t))
    {
        return Direction::Bidirectional;
    }

    DIRECTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| last.contains(k)))
        .map(|(direction, _)| *direction)
        .unwrap_or(Direction::Unknown)
}

/// Operating region of a commuter service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Jabodetabek,
    YogyaSolo,
    RangkasbitungMerak,
}

const YOGYA_SOLO_STATIONS: &[&str] = &[
    "palur",
    "solo jebres",
    "solo balapan",
    "purwosari",
    "gawok",
    "delanggu",
    "ceper",
    "klaten",
    "srowot",
    "brambanan",
    "maguwo",
    "lempuyangan",
    "yogyakarta",
    "wates",
    "wojo",
    "jenar",
    "kutoarjo",
];

// Rangkasbitung itself is shared with the Jabodetabek line and is not a
// signature here.
const RANGKASBITUNG_MERAK_STATIONS: &[&str] = &[
    "merak",
    "krenceng",
    "cilegon",
    "tonjong baru",
    "karangantu",
    "serang",
    "walantaka",
    "cikeusal",
    "catang",
    "jambu baru",
];

impl Region {
    pub const ALL: [Region; 3] = [
        Region::Jabodetabek,
        Region::YogyaSolo,
        Region::RangkasbitungMerak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Jabodetabek => "jabodetabek",
            Region::YogyaSolo => "yogya_solo",
            Region::RangkasbitungMerak => "rangkasbitung_merak",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == wanted)
            .ok_or_else(|| UnknownVariant::new("region", s))
    }
}

/// Classify a stop sequence into an operating region.
///
/// Anything not recognisably Yogya-Solo or Rangkasbitung-Merak is
/// Jabodetabek.
pub fn classify_region(stops: &[StationName]) -> Region {
    let calls_at = |set: &[&str]| stops.iter().any(|s| set.contains(&s.key()));

    if calls_at(YOGYA_SOLO_STATIONS) {
        Region::YogyaSolo
    } else if calls_at(RANGKASBITUNG_MERAK_STATIONS) {
        Region::RangkasbitungMerak
    } else {
        Region::Jabodetabek
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(names: &[&str]) -> Vec<StationName> {
        names
            .iter()
            .map(|n| StationName::parse(n).unwrap())
            .collect()
    }

    #[test]
    fn line_by_signature() {
        assert_eq!(
            classify_line(&route(&["Bogor", "Depok", "Manggarai"])),
            Line::Bogor
        );
        assert_eq!(
            classify_line(&route(&["Cikarang", "Bekasi", "Manggarai"])),
            Line::Cikarang
        );
        assert_eq!(
            classify_line(&route(&["Tanah Abang", "Serpong"])),
            Line::Rangkasbitung
        );
        assert_eq!(
            classify_line(&route(&["Duri", "Batu Ceper", "Tangerang"])),
            Line::Tangerang
        );
        assert_eq!(
            classify_line(&route(&["Jakarta Kota", "Ancol", "Tanjung Priok"])),
            Line::TanjungPriok
        );
        assert_eq!(
            classify_line(&route(&["Manggarai", "Jakarta Kota"])),
            Line::Unknown
        );
    }

    #[test]
    fn line_priority_order() {
        // Both Bogor and Cikarang signatures present: Cikarang wins
        assert_eq!(
            classify_line(&route(&["Bogor", "Manggarai", "Bekasi"])),
            Line::Cikarang
        );
    }

    #[test]
    fn line_requires_exact_station_not_substring() {
        // "Bogor Baru" is not the signature station "bogor"
        assert_eq!(classify_line(&route(&["Bogor Baru", "Sukasari"])), Line::Unknown);
    }

    #[test]
    fn line_is_stable_across_calls() {
        let r = route(&["Rangkasbitung", "Parung Panjang", "Tanah Abang"]);
        assert_eq!(classify_line(&r), classify_line(&r));
    }

    #[test]
    fn line_parse() {
        assert_eq!("Tanjung Priok".parse::<Line>().unwrap(), Line::TanjungPriok);
        assert_eq!("bogor".parse::<Line>().unwrap(), Line::Bogor);
        assert!("monorail".parse::<Line>().is_err());
    }

    #[test]
    fn direction_by_terminus() {
        assert_eq!(
            classify_direction(&route(&["Bogor", "Depok", "Jakarta Kota"])),
            Direction::TowardJakarta
        );
        assert_eq!(
            classify_direction(&route(&["Jakarta Kota", "Bogor"])),
            Direction::TowardBogor
        );
        assert_eq!(
            classify_direction(&route(&["Cikarang", "Kampung Bandan", "Angke"])),
            Direction::TowardJakarta
        );
        assert_eq!(
            classify_direction(&route(&["Manggarai", "Cikarang"])),
            Direction::TowardCikarang
        );
        assert_eq!(
            classify_direction(&route(&["Tanah Abang", "Serpong"])),
            Direction::TowardRangkasbitung
        );
        assert_eq!(
            classify_direction(&route(&["Duri", "Tangerang"])),
            Direction::TowardTangerang
        );
        assert_eq!(
            classify_direction(&route(&["Manggarai", "Cikini"])),
            Direction::Unknown
        );
    }

    #[test]
    fn shuttle_is_bidirectional_at_either_end() {
        assert_eq!(
            classify_direction(&route(&["Tanjung Priok", "Jakarta Kota"])),
            Direction::Bidirectional
        );
        assert_eq!(
            classify_direction(&route(&["Jakarta Kota", "Tanjung Priok"])),
            Direction::Bidirectional
        );
    }

    #[test]
    fn direction_needs_two_stops() {
        assert_eq!(classify_direction(&route(&["Bogor"])), Direction::Unknown);
        assert_eq!(classify_direction(&[]), Direction::Unknown);
    }

    #[test]
    fn region_classification() {
        assert_eq!(
            classify_region(&route(&["Yogyakarta", "Klaten", "Palur"])),
            Region::YogyaSolo
        );
        assert_eq!(
            classify_region(&route(&["Rangkasbitung", "Serang", "Merak"])),
            Region::RangkasbitungMerak
        );
        assert_eq!(
            classify_region(&route(&["Rangkasbitung", "Serpong", "Tanah Abang"])),
            Region::Jabodetabek
        );
    }

    #[test]
    fn region_parse() {
        assert_eq!("Yogya-Solo".parse::<Region>().unwrap(), Region::YogyaSolo);
        assert!("bandung".parse::<Region>().is_err());
    }
}
