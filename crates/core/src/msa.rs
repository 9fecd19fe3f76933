//! Metropolitan Statistical Area title parsing.
//!
//! BLS metro titles bundle several principal cities and states into one
//! label, e.g. `"Chicago-Naperville-Elgin, IL-IN-WI"`. The titles never say
//! which city lies in which state, so expansion into (city, state) pairs
//! follows a fixed heuristic:
//!
//! - one state: every city gets that state;
//! - several states: city `i` gets `states[min(i, len - 1)]`;
//! - exactly two cities and two states: the second city is also paired with
//!   the first state (twin cities straddling a state line).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::location::LocationKey;
use crate::states::is_state_code;

/// Trailing state segment: one or more 2-letter codes joined by hyphens.
#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static STATE_SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}(?:-[A-Z]{2})*$").unwrap());

const CITY_SEPARATORS: [char; 2] = ['-', '/'];

/// Shortest city token kept without an allow-list entry.
const MIN_CITY_CHARS: usize = 3;

/// Cities and states extracted from one area title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMsa {
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub original_name: String,
}

/// Result of expanding a metro-area row into concrete locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaExpansion {
    pub combinations: Vec<LocationKey>,
    pub is_msa: bool,
    pub original_name: String,
}

/// How a title splits around its last comma.
enum TitleShape<'a> {
    /// `"<cities>, <ST[-ST...]>"`
    Standard { city_part: &'a str, state_segment: &'a str },
    /// No comma at all: every token is a city in the fallback state.
    NoComma { city_part: &'a str },
    /// A comma, but no recognizable state codes after it.
    Malformed { city_part: &'a str },
}

impl<'a> TitleShape<'a> {
    fn of(title: &'a str) -> Self {
        let title = title.trim();
        match title.rfind(',') {
            None => Self::NoComma { city_part: title },
            Some(idx) => {
                let (head, tail) = (title[..idx].trim(), title[idx + 1..].trim());
                if STATE_SEGMENT_REGEX.is_match(tail) {
                    Self::Standard { city_part: head, state_segment: tail }
                } else {
                    Self::Malformed { city_part: head }
                }
            },
        }
    }

    /// The title with any trailing state segment removed.
    fn stripped(&self, title: &'a str) -> &'a str {
        match *self {
            Self::Standard { city_part, .. } => city_part,
            Self::NoComma { .. } | Self::Malformed { .. } => title.trim(),
        }
    }
}

/// Whether `title` names several cities (its city part still contains a
/// hyphen or slash once the state segment is stripped).
#[must_use]
pub fn is_msa(title: &str) -> bool {
    TitleShape::of(title).stripped(title).contains(CITY_SEPARATORS)
}

/// Parses with the default parser. See [`MsaParser::parse`].
#[must_use]
pub fn parse_msa(title: &str, fallback_state: Option<&str>) -> ParsedMsa {
    MsaParser::default().parse(title, fallback_state)
}

/// Area-title parser with an optional allow-list of legitimate short city
/// names that would otherwise be dropped as splitting artifacts.
#[derive(Debug, Clone, Default)]
pub struct MsaParser {
    short_names: Vec<String>,
}

impl MsaParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps these names even when they are two characters or shorter.
    #[must_use]
    pub fn with_short_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.short_names.extend(names.into_iter().map(|n| n.as_ref().trim().to_lowercase()));
        self
    }

    /// Splits `title` into city tokens and state codes.
    ///
    /// Without a trailing state segment the cities are placed in
    /// `fallback_state`. Never fails; a title whose tokens are all filtered
    /// falls back to its whole city part as a single city.
    #[must_use]
    pub fn parse(&self, title: &str, fallback_state: Option<&str>) -> ParsedMsa {
        let fallback = normalize_state(fallback_state);
        let (cities, states) = match TitleShape::of(title) {
            TitleShape::Standard { city_part, state_segment } => {
                let states: Vec<String> = state_segment
                    .split('-')
                    .map(str::trim)
                    .filter(|s| is_state_code(s))
                    .map(ToOwned::to_owned)
                    .collect();
                let states = if states.is_empty() { fallback.into_iter().collect() } else { states };
                (self.city_tokens_or_whole(city_part), states)
            },
            TitleShape::NoComma { city_part } => {
                (self.city_tokens_or_whole(city_part), fallback.into_iter().collect())
            },
            TitleShape::Malformed { city_part } => {
                let cities = self.whole_city(city_part).into_iter().collect();
                (cities, fallback.into_iter().collect())
            },
        };
        ParsedMsa { cities, states, original_name: title.to_owned() }
    }

    /// Expands a metro row into (city, state) keys.
    ///
    /// Multi-city titles go through [`ParsedMsa::combinations`]; single-city
    /// titles keep the whole city part and the first trailing state code,
    /// or `fallback_state` when the title has none.
    #[must_use]
    pub fn expand(&self, title: &str, fallback_state: Option<&str>) -> AreaExpansion {
        let multi = is_msa(title);
        let combinations = if multi {
            self.parse(title, fallback_state).combinations()
        } else {
            single_city(title, fallback_state).into_iter().collect()
        };
        AreaExpansion { combinations, is_msa: multi, original_name: title.to_owned() }
    }

    fn city_tokens_or_whole(&self, city_part: &str) -> Vec<String> {
        let tokens: Vec<String> = city_part
            .split(CITY_SEPARATORS)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter(|t| self.is_city_token(t))
            .map(ToOwned::to_owned)
            .collect();
        if tokens.is_empty() { self.whole_city(city_part).into_iter().collect() } else { tokens }
    }

    fn whole_city(&self, city_part: &str) -> Option<String> {
        let city = city_part.trim();
        (!city.is_empty() && self.is_city_token(city)).then(|| city.to_owned())
    }

    fn is_city_token(&self, token: &str) -> bool {
        if is_state_code(token) {
            return false;
        }
        token.chars().count() >= MIN_CITY_CHARS
            || self.short_names.iter().any(|n| *n == token.to_lowercase())
    }
}

impl ParsedMsa {
    /// Whether the original title names several cities.
    #[must_use]
    pub fn is_msa(&self) -> bool {
        is_msa(&self.original_name)
    }

    /// Ordered, de-duplicated (city, state) pairs. See the module docs for
    /// the pairing rules.
    #[must_use]
    pub fn combinations(&self) -> Vec<LocationKey> {
        let Some(last_state) = self.states.len().checked_sub(1) else {
            return Vec::new();
        };

        let mut pairs: Vec<(&str, &str)> = self
            .cities
            .iter()
            .enumerate()
            .map(|(i, city)| (city.as_str(), self.states[i.min(last_state)].as_str()))
            .collect();

        if let ([_, second], [first_state, _]) = (self.cities.as_slice(), self.states.as_slice()) {
            pairs.push((second.as_str(), first_state.as_str()));
        }

        let mut seen = HashSet::with_capacity(pairs.len());
        pairs
            .into_iter()
            .map(|(city, state)| LocationKey::new(city, state))
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }
}

fn normalize_state(state: Option<&str>) -> Option<String> {
    state.map(|s| s.trim().to_ascii_uppercase()).filter(|s| is_state_code(s))
}

fn single_city(title: &str, fallback_state: Option<&str>) -> Option<LocationKey> {
    let fallback = normalize_state(fallback_state);
    let (city, state) = match TitleShape::of(title) {
        TitleShape::Standard { city_part, state_segment } => {
            let first = state_segment.split('-').map(str::trim).find(|s| is_state_code(s));
            (city_part, first.map(ToOwned::to_owned).or(fallback))
        },
        TitleShape::NoComma { city_part } | TitleShape::Malformed { city_part } => {
            (city_part, fallback)
        },
    };
    let city = city.trim();
    if city.is_empty() {
        return None;
    }
    state.map(|state| LocationKey::new(city, state))
}
