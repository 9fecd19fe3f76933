//! BLS area-type codes and the geographic granularity they map to.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// `AREA_TYPE` column of the OEWS tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    /// 1: the whole United States.
    National,
    /// 2: a state, DC, or Puerto Rico.
    State,
    /// 3: a U.S. territory.
    Territory,
    /// 4: a metropolitan statistical area.
    Metropolitan,
    /// 6: a nonmetropolitan area.
    Nonmetropolitan,
}

/// Geographic granularity of an eligible row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    National,
    State,
    City,
}

impl AreaType {
    /// Numeric code used by the data provider.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match *self {
            Self::National => 1,
            Self::State => 2,
            Self::Territory => 3,
            Self::Metropolitan => 4,
            Self::Nonmetropolitan => 6,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::National),
            2 => Some(Self::State),
            3 => Some(Self::Territory),
            4 => Some(Self::Metropolitan),
            6 => Some(Self::Nonmetropolitan),
            _ => None,
        }
    }

    /// Granularity for supported area types; `None` means the row is skipped.
    #[must_use]
    pub const fn granularity(&self) -> Option<Granularity> {
        match *self {
            Self::National => Some(Granularity::National),
            Self::State => Some(Granularity::State),
            Self::Metropolitan => Some(Granularity::City),
            Self::Territory | Self::Nonmetropolitan => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::National => "national",
            Self::State => "state",
            Self::Territory => "territory",
            Self::Metropolitan => "metropolitan",
            Self::Nonmetropolitan => "nonmetropolitan",
        }
    }
}

impl FromStr for AreaType {
    type Err = CoreError;

    /// Accepts the provider's numeric codes, including spreadsheet renderings
    /// such as `"04"` or `"4.0"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| CoreError::UnknownAreaType(trimmed.to_owned()))
    }
}

impl Granularity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::National => "national",
            Self::State => "state",
            Self::City => "city",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_codes() {
        assert_eq!("1".parse::<AreaType>(), Ok(AreaType::National));
        assert_eq!(" 2 ".parse::<AreaType>(), Ok(AreaType::State));
        assert_eq!("04".parse::<AreaType>(), Ok(AreaType::Metropolitan));
        assert_eq!("6.0".parse::<AreaType>(), Ok(AreaType::Nonmetropolitan));
        assert!("5".parse::<AreaType>().is_err());
        assert!("msa".parse::<AreaType>().is_err());
    }

    #[test]
    fn only_national_state_and_metro_are_supported() {
        assert_eq!(AreaType::National.granularity(), Some(Granularity::National));
        assert_eq!(AreaType::State.granularity(), Some(Granularity::State));
        assert_eq!(AreaType::Metropolitan.granularity(), Some(Granularity::City));
        assert_eq!(AreaType::Territory.granularity(), None);
        assert_eq!(AreaType::Nonmetropolitan.granularity(), None);
    }

    #[test]
    fn code_round_trips() {
        for t in [AreaType::National, AreaType::State, AreaType::Metropolitan] {
            assert_eq!(AreaType::from_code(t.code()), Some(t));
        }
    }
}
