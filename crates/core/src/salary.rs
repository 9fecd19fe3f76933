//! SalaryData observations and their natural key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Percentile and mean wages, hourly and annual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WageFigures {
    pub hourly_10th: Option<f64>,
    pub hourly_25th: Option<f64>,
    pub hourly_median: Option<f64>,
    pub hourly_75th: Option<f64>,
    pub hourly_90th: Option<f64>,
    pub hourly_mean: Option<f64>,
    pub annual_10th: Option<f64>,
    pub annual_25th: Option<f64>,
    pub annual_median: Option<f64>,
    pub annual_75th: Option<f64>,
    pub annual_90th: Option<f64>,
    pub annual_mean: Option<f64>,
}

impl WageFigures {
    /// True when every wage cell was suppressed or absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            self.hourly_10th,
            self.hourly_25th,
            self.hourly_median,
            self.hourly_75th,
            self.hourly_90th,
            self.hourly_mean,
            self.annual_10th,
            self.annual_25th,
            self.annual_median,
            self.annual_75th,
            self.annual_90th,
            self.annual_mean,
        ]
        .iter()
        .all(Option::is_none)
    }
}

/// One wage observation for a career, a location (or the nation), and a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryData {
    pub career_keyword: String,
    /// `None` for national scope.
    pub location_id: Option<String>,
    pub year: i32,
    #[serde(flatten)]
    pub wages: WageFigures,
    pub employment_count: Option<i64>,
    pub jobs_per_1000: Option<f64>,
    pub location_quotient: Option<f64>,
    pub mean_error_margin: Option<f64>,
    pub emp_error_margin: Option<f64>,
    pub source: String,
}

impl SalaryData {
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::new(&self.career_keyword, self.location_id.as_deref(), self.year)
    }
}

/// `(career_keyword, location_id, year)`, unique per SalaryData row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NaturalKey {
    pub career_keyword: String,
    pub location_id: Option<String>,
    pub year: i32,
}

impl NaturalKey {
    pub fn new(career_keyword: impl Into<String>, location_id: Option<&str>, year: i32) -> Self {
        Self { career_keyword: career_keyword.into(), location_id: location_id.map(ToOwned::to_owned), year }
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.career_keyword,
            self.location_id.as_deref().unwrap_or("national"),
            self.year
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(location_id: Option<&str>) -> SalaryData {
        SalaryData {
            career_keyword: "registered-nurses".to_owned(),
            location_id: location_id.map(ToOwned::to_owned),
            year: 2024,
            wages: WageFigures { annual_median: Some(93_600.0), ..WageFigures::default() },
            employment_count: Some(3_282_010),
            jobs_per_1000: None,
            location_quotient: None,
            mean_error_margin: None,
            emp_error_margin: None,
            source: "BLS".to_owned(),
        }
    }

    #[test]
    fn national_and_local_keys_differ() {
        let national = record(None).natural_key();
        let local = record(Some("loc-1")).natural_key();
        assert_ne!(national, local);
        assert_eq!(national.to_string(), "registered-nurses|national|2024");
        assert_eq!(local, NaturalKey::new("registered-nurses", Some("loc-1"), 2024));
    }

    #[test]
    fn empty_wage_figures() {
        assert!(WageFigures::default().is_empty());
        assert!(!record(None).wages.is_empty());
    }
}
