//! Location Parser — turns a free-form location string into a city/state filter.
//!
//! Never fails. Unrecognized input degrades to a city-only filter so the
//! aggregator's fallback cascade can handle it instead of the request erroring.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Structured location scope used to filter postings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    pub city: Option<String>,
    /// Upper-case 2-letter state code.
    pub state: Option<String>,
}

impl LocationFilter {
    pub fn state_only(&self) -> Self {
        Self {
            city: None,
            state: self.state.clone(),
        }
    }
}

/// Full state name → postal code. Names are matched case-insensitively.
const STATE_CODES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Resolves a full state name to its postal code.
pub fn state_code_for_name(name: &str) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    STATE_CODES
        .iter()
        .find(|(state_name, _)| *state_name == needle)
        .map(|(_, code)| *code)
}

fn is_two_chars(s: &str) -> bool {
    s.chars().count() == 2
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn normalize_state(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if is_two_chars(raw) {
        return Some(raw.to_uppercase());
    }
    Some(
        state_code_for_name(raw)
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_uppercase()),
    )
}

/// Parses a free-form location such as `"Cleveland, OH"`, `"Ohio"` or `"OH"`.
///
/// Rules, in order:
/// 1. `"<city>, <state>"` — state may be a code or a full name.
/// 2. A bare 2-character input is a state code.
/// 3. A recognized full state name.
/// 4. Anything else is taken as a city name.
pub fn parse_location(input: &str) -> LocationFilter {
    let trimmed = input.trim();

    if trimmed.contains(',') {
        let mut parts = trimmed.split(',').map(str::trim);
        let city = parts.next().and_then(non_empty);
        let state = parts.next().and_then(normalize_state);
        return LocationFilter { city, state };
    }

    if is_two_chars(trimmed) {
        return LocationFilter {
            city: None,
            state: Some(trimmed.to_uppercase()),
        };
    }

    if let Some(code) = state_code_for_name(trimmed) {
        return LocationFilter {
            city: None,
            state: Some(code.to_string()),
        };
    }

    // Misspelled state names land here too and will simply match no postings.
    debug!("Location {trimmed:?} not recognized as a state; treating as city");
    LocationFilter {
        city: non_empty(trimmed),
        state: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(city: Option<&str>, state: Option<&str>) -> LocationFilter {
        LocationFilter {
            city: city.map(str::to_string),
            state: state.map(str::to_string),
        }
    }

    #[test]
    fn test_city_and_state_code() {
        assert_eq!(
            parse_location("Cleveland, OH"),
            filter(Some("Cleveland"), Some("OH"))
        );
    }

    #[test]
    fn test_city_and_full_state_name() {
        assert_eq!(
            parse_location("Cleveland, Ohio"),
            filter(Some("Cleveland"), Some("OH"))
        );
    }

    #[test]
    fn test_lowercase_state_code_after_comma() {
        assert_eq!(
            parse_location("Austin,tx"),
            filter(Some("Austin"), Some("TX"))
        );
    }

    #[test]
    fn test_unknown_state_after_comma_is_uppercased() {
        assert_eq!(
            parse_location("Toronto, Ontario"),
            filter(Some("Toronto"), Some("ONTARIO"))
        );
    }

    #[test]
    fn test_bare_state_name() {
        assert_eq!(parse_location("Ohio"), filter(None, Some("OH")));
        assert_eq!(parse_location("new york"), filter(None, Some("NY")));
    }

    #[test]
    fn test_bare_state_code() {
        assert_eq!(parse_location("OH"), filter(None, Some("OH")));
        assert_eq!(parse_location(" oh "), filter(None, Some("OH")));
    }

    #[test]
    fn test_unrecognized_input_is_city() {
        assert_eq!(
            parse_location("Nowhereville"),
            filter(Some("Nowhereville"), None)
        );
    }

    #[test]
    fn test_misspelled_state_becomes_city() {
        assert_eq!(parse_location("Ohioo"), filter(Some("Ohioo"), None));
    }

    #[test]
    fn test_extra_comma_parts_are_ignored() {
        assert_eq!(
            parse_location("Cleveland, OH, USA"),
            filter(Some("Cleveland"), Some("OH"))
        );
    }

    #[test]
    fn test_empty_parts_are_none() {
        assert_eq!(parse_location(", OH"), filter(None, Some("OH")));
        assert_eq!(parse_location("Cleveland,"), filter(Some("Cleveland"), None));
    }

    #[test]
    fn test_state_only_drops_city() {
        let f = filter(Some("Cleveland"), Some("OH"));
        assert_eq!(f.state_only(), filter(None, Some("OH")));
    }
}
