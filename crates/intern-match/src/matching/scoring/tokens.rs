use std::collections::BTreeSet;

/// Lower-cases, splits on commas, trims, and drops empty tokens.
pub(crate) fn token_set(raw: &str) -> BTreeSet<String> {
    raw.to_lowercase()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Token set for an optional free-text field; absent fields yield no tokens.
pub(crate) fn optional_token_set(raw: Option<&str>) -> BTreeSet<String> {
    token_set(raw.unwrap_or_default())
}

/// Scalar form of a single free-text value used for exact comparisons.
pub(crate) fn normalize_scalar(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_lowercase().trim().to_string()
}
