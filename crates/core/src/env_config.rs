//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Like [`env_parse_with_default`], then clamps the value into `min..=max`.
///
/// Out-of-range values are clamped with a warning rather than rejected.
pub fn env_parse_clamped<T>(var: &str, default: T, min: T, max: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd + Copy,
{
    let value = env_parse_with_default(var, default);
    if value < min || value > max {
        let clamped = if value < min { min } else { max };
        tracing::warn!(var, value = %value, clamped = %clamped, "env var out of range, clamping");
        return clamped;
    }
    value
}

/// Read an optional string variable, treating blank values as unset.
pub fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
