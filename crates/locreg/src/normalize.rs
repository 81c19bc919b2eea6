/// Canonical form of a location code, used as the equality key everywhere.
///
/// Trims, uppercases, and collapses internal whitespace runs to single
/// spaces. Two strings name the same location iff their normalized forms are
/// byte-equal.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
