/// Canonical comparison form of a token or target word: ASCII-alphanumeric
/// characters only, lowercased. Everything else (punctuation, whitespace,
/// combining marks) is dropped rather than replaced.
///
/// Pure and total; the empty string normalizes to the empty string.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
