//! Row eligibility: which source rows the pipeline imports at all.

use oews_atlas_core::constants::{CROSS_INDUSTRY_NAICS, DETAILED_OCC_GROUP};
use oews_atlas_core::{AreaType, Granularity};
use serde::Serialize;

use crate::source::SourceRow;

/// Why an ineligible row was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Area type other than national, state or metropolitan.
    UnsupportedAreaType,
    /// An occupation rollup rather than a detailed occupation.
    NotDetailed,
    /// A single industry rather than the cross-industry aggregate.
    IndustrySpecific,
    /// Outside the configured occupation-code prefixes.
    OccupationPrefix,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::UnsupportedAreaType => "unsupported_area_type",
            Self::NotDetailed => "not_detailed",
            Self::IndustrySpecific => "industry_specific",
            Self::OccupationPrefix => "occupation_prefix",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible(Granularity),
    Skipped(SkipReason),
}

/// Classifies `row`; checks run in column order so each skipped row gets
/// exactly one reason.
#[must_use]
pub fn classify(row: &SourceRow, occupation_prefixes: &[String]) -> Eligibility {
    let Some(granularity) =
        row.area_type.parse::<AreaType>().ok().and_then(|t| t.granularity())
    else {
        return Eligibility::Skipped(SkipReason::UnsupportedAreaType);
    };
    if !row.o_group.trim().eq_ignore_ascii_case(DETAILED_OCC_GROUP) {
        return Eligibility::Skipped(SkipReason::NotDetailed);
    }
    if !is_cross_industry(&row.naics) {
        return Eligibility::Skipped(SkipReason::IndustrySpecific);
    }
    if !occupation_prefixes.is_empty()
        && !occupation_prefixes.iter().any(|p| row.occ_code.trim().starts_with(p.as_str()))
    {
        return Eligibility::Skipped(SkipReason::OccupationPrefix);
    }
    Eligibility::Eligible(granularity)
}

/// `000000`, also when a spreadsheet export dropped the leading zeros.
fn is_cross_industry(naics: &str) -> bool {
    let naics = naics.trim();
    naics == CROSS_INDUSTRY_NAICS || (!naics.is_empty() && naics.bytes().all(|b| b == b'0'))
}
