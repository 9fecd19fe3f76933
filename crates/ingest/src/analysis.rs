//! Dry-run breakdown of a source file: what an import would keep, skip and
//! split, without touching the store.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use oews_atlas_core::constants::ANALYSIS_SAMPLES_PER_TYPE;
use oews_atlas_core::{AreaType, Granularity, LocationKey, MsaParser};
use serde::Serialize;

use crate::error::IngestError;
use crate::filter::{Eligibility, classify};
use crate::source::{Delimiter, SourceRows, open_source, source_rows};

/// Counts by area type, occupation group, eligibility and MSA handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceAnalysis {
    pub rows: u64,
    pub unreadable_rows: u64,
    /// Keyed by the area-type name, or the raw value when unknown.
    pub area_types: BTreeMap<String, AreaTypeBreakdown>,
    pub occupation_groups: BTreeMap<String, u64>,
    pub eligible_rows: u64,
    pub eligible_by_granularity: BTreeMap<String, u64>,
    pub skipped_by_reason: BTreeMap<String, u64>,
    /// Distinct eligible metro titles naming several cities.
    pub msa_titles: u64,
    /// Distinct eligible metro titles naming one city.
    pub single_city_titles: u64,
    /// Distinct eligible metro titles that yield no (city, state) pair.
    pub unresolvable_titles: Vec<String>,
    /// Distinct (city, state) pairs the eligible metro rows expand to.
    pub city_locations: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AreaTypeBreakdown {
    pub rows: u64,
    pub distinct_areas: u64,
    pub samples: Vec<String>,
}

/// Reads the whole source and tallies it. Never writes.
pub fn analyze_reader<R: Read>(
    read: R,
    delimiter: Delimiter,
    occupation_prefixes: &[String],
) -> Result<SourceAnalysis, IngestError> {
    analyze_rows(source_rows(read, delimiter)?, occupation_prefixes)
}

pub fn analyze_path(
    path: &Path,
    delimiter: Option<Delimiter>,
    occupation_prefixes: &[String],
) -> Result<SourceAnalysis, IngestError> {
    analyze_rows(open_source(path, delimiter)?, occupation_prefixes)
}

fn analyze_rows<R: Read>(
    rows: SourceRows<R>,
    occupation_prefixes: &[String],
) -> Result<SourceAnalysis, IngestError> {
    let parser = MsaParser::new();
    let mut analysis = SourceAnalysis::default();
    let mut areas: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut metro_titles: HashSet<String> = HashSet::new();
    let mut unresolvable: BTreeSet<String> = BTreeSet::new();
    let mut city_keys: HashSet<LocationKey> = HashSet::new();

    for result in rows {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(_) => {
                analysis.rows += 1;
                analysis.unreadable_rows += 1;
                continue;
            },
        };
        analysis.rows += 1;

        let type_label = row
            .area_type
            .parse::<AreaType>()
            .map_or_else(|_| format!("unknown ({})", row.area_type.trim()), |t| t.as_str().to_owned());
        let breakdown = analysis.area_types.entry(type_label.clone()).or_default();
        breakdown.rows += 1;
        let title = row.area_title.trim().to_owned();
        if areas.entry(type_label).or_default().insert(title.clone())
            && breakdown.samples.len() < ANALYSIS_SAMPLES_PER_TYPE
        {
            breakdown.samples.push(title.clone());
        }

        *analysis.occupation_groups.entry(row.o_group.trim().to_lowercase()).or_default() += 1;

        match classify(&row, occupation_prefixes) {
            Eligibility::Skipped(reason) => {
                *analysis.skipped_by_reason.entry(reason.as_str().to_owned()).or_default() += 1;
            },
            Eligibility::Eligible(granularity) => {
                analysis.eligible_rows += 1;
                *analysis
                    .eligible_by_granularity
                    .entry(granularity.as_str().to_owned())
                    .or_default() += 1;

                if granularity == Granularity::City && metro_titles.insert(title.clone()) {
                    let expansion = parser.expand(&title, Some(&row.prim_state));
                    if expansion.combinations.is_empty() {
                        unresolvable.insert(title);
                    } else if expansion.is_msa {
                        analysis.msa_titles += 1;
                    } else {
                        analysis.single_city_titles += 1;
                    }
                    city_keys.extend(expansion.combinations);
                }
            },
        }
    }

    for (label, titles) in areas {
        if let Some(breakdown) = analysis.area_types.get_mut(&label) {
            breakdown.distinct_areas = titles.len() as u64;
        }
    }
    analysis.unresolvable_titles = unresolvable.into_iter().collect();
    analysis.city_locations = city_keys.len() as u64;

    tracing::info!(
        rows = analysis.rows,
        eligible = analysis.eligible_rows,
        msa_titles = analysis.msa_titles,
        city_locations = analysis.city_locations,
        "Source analyzed"
    );
    Ok(analysis)
}
