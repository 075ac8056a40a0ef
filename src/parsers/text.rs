/// Collapses every run of whitespace (spaces, tabs, newlines) into a single
/// space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true if the text has no visible characters
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
