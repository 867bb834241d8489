//! Small string helpers shared by the composer and the pipeline stages.

/// Trims, lower-cases, then upper-cases the first character.
/// Blank input is returned untouched.
pub fn sentence_case(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return value.to_string();
    }

    let lower = trimmed.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lower,
    }
}

/// Keeps at most `max` characters (not bytes).
pub fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Cuts `value` at the first occurrence of any separator.
pub fn cut_at_separators<'a>(value: &'a str, separators: &[char]) -> &'a str {
    match value.find(|c: char| separators.contains(&c)) {
        Some(idx) => &value[..idx],
        None => value,
    }
}

/// Splits prose on sentence terminators and line breaks, dropping blank fragments.
pub fn split_sentences(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(['.', '!', '?', '\n', '\r'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
