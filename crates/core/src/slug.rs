//! URL-safe identifiers for careers and locations.

/// Lower-cases `text`, collapses every run of non-alphanumeric characters
/// into one hyphen and trims hyphens from both ends.
///
/// Apostrophes are dropped without introducing a separator, so
/// `"Workers' Advocates"` becomes `workers-advocates`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch != '\'' && ch != '\u{2019}' {
            pending_separator = true;
        }
    }
    slug
}

/// Slug for a Location row.
///
/// City-level rows use `city-state` (`"Fort Worth", "TX"` → `fort-worth-tx`);
/// state-level rows (empty city) use the state display name alone.
#[must_use]
pub fn location_slug(city: &str, state: &str, state_name: &str) -> String {
    if city.trim().is_empty() {
        let slug = slugify(state_name);
        if slug.is_empty() { slugify(state) } else { slug }
    } else {
        slugify(&format!("{city}-{state}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("Registered Nurses"), "registered-nurses");
        assert_eq!(slugify("  Dentists, General  "), "dentists-general");
        assert_eq!(slugify("Nurse Anesthetists -- (CRNA)"), "nurse-anesthetists-crna");
        assert_eq!(slugify("Workers' Advocates"), "workers-advocates");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn city_and_state_slugs() {
        assert_eq!(location_slug("Fort Worth", "TX", "Texas"), "fort-worth-tx");
        assert_eq!(location_slug("Winston-Salem", "NC", "North Carolina"), "winston-salem-nc");
        assert_eq!(location_slug("", "TX", "Texas"), "texas");
        assert_eq!(location_slug("", "DC", "District of Columbia"), "district-of-columbia");
        assert_eq!(location_slug("", "ZZ", ""), "zz");
    }
}
