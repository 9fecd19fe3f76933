#![expect(clippy::unwrap_used, reason = "test code")]

use super::SAMPLE_CSV;
use crate::{Delimiter, analyze_reader};

#[test]
fn test_breakdown_of_sample_source() {
    let analysis = analyze_reader(SAMPLE_CSV.as_bytes(), Delimiter::Comma, &[]).unwrap();

    assert_eq!(analysis.rows, 6);
    assert_eq!(analysis.unreadable_rows, 0);
    assert_eq!(analysis.eligible_rows, 3);
    assert_eq!(analysis.area_types["national"].rows, 3);
    assert_eq!(analysis.area_types["national"].distinct_areas, 1);
    assert_eq!(analysis.area_types["national"].samples, vec!["U.S."]);
    assert_eq!(analysis.area_types["nonmetropolitan"].rows, 1);
    assert_eq!(analysis.occupation_groups["detailed"], 5);
    assert_eq!(analysis.occupation_groups["major"], 1);
    assert_eq!(analysis.eligible_by_granularity["city"], 1);
    assert_eq!(analysis.skipped_by_reason["unsupported_area_type"], 1);
    assert_eq!(analysis.skipped_by_reason["not_detailed"], 1);
    assert_eq!(analysis.skipped_by_reason["industry_specific"], 1);
    assert_eq!(analysis.msa_titles, 1);
    assert_eq!(analysis.single_city_titles, 0);
    assert_eq!(analysis.city_locations, 3);
    assert!(analysis.unresolvable_titles.is_empty());
}

#[test]
fn test_metro_titles_are_counted_once() {
    let data = "\
AREA_TITLE,AREA_TYPE,PRIM_STATE,NAICS,O_GROUP,OCC_TITLE
\"Abilene, TX\",4,TX,000000,detailed,Registered Nurses
\"Abilene, TX\",4,TX,000000,detailed,Pharmacists
\"Kingsport-Bristol, TN-VA\",4,TN,000000,detailed,Pharmacists
Ab-Cd,4,,000000,detailed,Pharmacists
Mystery Area,9,,000000,detailed,Pharmacists
";
    let analysis = analyze_reader(data.as_bytes(), Delimiter::Comma, &[]).unwrap();

    assert_eq!(analysis.single_city_titles, 1);
    assert_eq!(analysis.msa_titles, 1);
    assert_eq!(analysis.city_locations, 4);
    assert_eq!(analysis.unresolvable_titles, vec!["Ab-Cd"]);
    assert_eq!(analysis.area_types["metropolitan"].distinct_areas, 3);
    assert_eq!(analysis.area_types["unknown (9)"].rows, 1);
}

#[test]
fn test_unreadable_rows_are_counted() {
    let data = "AREA_TITLE,AREA_TYPE,OCC_TITLE\nU.S.,1\nU.S.,1,Pharmacists\n";
    let analysis = analyze_reader(data.as_bytes(), Delimiter::Comma, &[]).unwrap();

    assert_eq!(analysis.rows, 2);
    assert_eq!(analysis.unreadable_rows, 1);
    assert_eq!(analysis.skipped_by_reason["not_detailed"], 1);
}
