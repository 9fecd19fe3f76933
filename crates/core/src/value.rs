//! Spreadsheet cell values and their normalization into nullable numbers.
//!
//! BLS tables mix real numbers with sentinel markers: `*` (estimate not
//! released), `**` (employment estimate not available) and `#` (wage at or
//! above the top of the published range). All of them mean "no value",
//! never zero.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// Characters whose presence anywhere in a cell marks it as suppressed.
const SUPPRESSION_MARKERS: [char; 2] = ['#', '*'];

/// A raw cell as it arrives from the source table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell, missing column, or explicit null.
    #[default]
    Absent,
    /// A finite number.
    Numeric(f64),
    /// Anything else: sentinel markers and unparseable text.
    Text(String),
}

impl CellValue {
    /// Classify a raw string cell.
    ///
    /// Thousands separators (`"1,234"`) are accepted; sentinel markers and
    /// other non-numeric text become [`CellValue::Text`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Absent;
        }
        if is_suppression_marker(trimmed) {
            return Self::Text(trimmed.to_owned());
        }
        match strip_thousands_separators(trimmed).and_then(|s| s.parse::<f64>().ok()) {
            Some(n) if n.is_finite() => Self::Numeric(n),
            _ => Self::Text(trimmed.to_owned()),
        }
    }

    /// Wrap a number, mapping NaN and infinities to [`CellValue::Absent`].
    #[must_use]
    pub fn from_f64(n: f64) -> Self {
        if n.is_finite() { Self::Numeric(n) } else { Self::Absent }
    }

    /// Whether the cell carries a suppression marker.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Text(t) if is_suppression_marker(t))
    }

    /// Normalize to a finite number or `None`.
    #[must_use]
    pub fn normalize(&self) -> Option<f64> {
        match *self {
            Self::Numeric(n) if n.is_finite() => Some(n),
            _ => None,
        }
    }

    /// Normalize, then round to the nearest whole number.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "employment counts are far below i64::MAX; the cast saturates otherwise"
    )]
    pub fn normalize_rounded(&self) -> Option<i64> {
        self.normalize().map(|n| n.round() as i64)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Absent, Self::from_f64)
    }
}

impl From<&str> for CellValue {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Normalize a cell to a finite number, or `None` for anything else.
#[must_use]
pub fn normalize_value(value: &CellValue) -> Option<f64> {
    value.normalize()
}

/// Integer-rounding variant of [`normalize_value`].
#[must_use]
pub fn normalize_value_rounded(value: &CellValue) -> Option<i64> {
    value.normalize_rounded()
}

fn is_suppression_marker(s: &str) -> bool {
    s.contains(SUPPRESSION_MARKERS)
}

/// Removes grouping commas when they sit at valid thousands positions.
/// Returns `None` for malformed grouping such as `"1,23"`.
fn strip_thousands_separators(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_owned());
    }
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let unsigned = int_part.strip_prefix(['-', '+']).unwrap_or(int_part);
    let mut groups = unsigned.split(',');
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    let mut cleaned: String = int_part.chars().filter(|c| *c != ',').collect();
    if let Some(frac) = frac_part {
        cleaned.push('.');
        cleaned.push_str(frac);
    }
    Some(cleaned)
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a string, or nothing")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(CellValue::Text(v.to_string()))
    }

    #[allow(clippy::cast_precision_loss, reason = "cell integers fit in f64 mantissa")]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(CellValue::Numeric(v as f64))
    }

    #[allow(clippy::cast_precision_loss, reason = "cell integers fit in f64 mantissa")]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(CellValue::Numeric(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(CellValue::from_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(CellValue::parse(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CellValue::Absent)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CellValue::Absent)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(Self)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_normalize_to_none() {
        for raw in ["#", "*", "**", "", "   ", "(8)*", "230,000#"] {
            assert_eq!(CellValue::parse(raw).normalize(), None, "raw {raw:?}");
        }
        assert_eq!(CellValue::Absent.normalize(), None);
        assert_eq!(CellValue::from(None).normalize(), None);
    }

    #[test]
    fn suppression_is_not_zero() {
        let cell = CellValue::parse("*");
        assert!(cell.is_suppressed());
        assert_ne!(cell.normalize(), Some(0.0));
    }

    #[test]
    fn numeric_strings_normalize() {
        assert_eq!(CellValue::parse("42.5").normalize(), Some(42.5));
        assert_eq!(CellValue::parse(" 1,234 ").normalize(), Some(1234.0));
        assert_eq!(CellValue::parse("3,175,390").normalize(), Some(3_175_390.0));
        assert_eq!(CellValue::parse("-1,000.25").normalize(), Some(-1000.25));
        assert_eq!(CellValue::parse("0").normalize(), Some(0.0));
    }

    #[test]
    fn malformed_text_normalizes_to_none() {
        for raw in ["n/a", "1,23", "12abc", "NaN", "inf", ",100"] {
            assert_eq!(CellValue::parse(raw).normalize(), None, "raw {raw:?}");
        }
    }

    #[test]
    fn rounded_variant_preserves_none() {
        assert_eq!(CellValue::parse("1,234.6").normalize_rounded(), Some(1235));
        assert_eq!(CellValue::parse("**").normalize_rounded(), None);
        assert_eq!(normalize_value_rounded(&CellValue::Absent), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["#", "", "12.75", "1,234", "junk"] {
            let once = normalize_value(&CellValue::parse(raw));
            let twice = normalize_value(&CellValue::from(once));
            assert_eq!(once, twice, "raw {raw:?}");
        }
    }

    #[test]
    fn non_finite_numbers_are_absent() {
        assert_eq!(CellValue::from_f64(f64::NAN), CellValue::Absent);
        assert_eq!(CellValue::from_f64(f64::INFINITY), CellValue::Absent);
    }
}
