use super::token_index::TokenIndex;

pub struct WordLocator;

impl WordLocator {
    /// Find the leftmost occurrence of `target` in the index's character
    /// stream and return the index of the token that contributed the first
    /// matched character.
    ///
    /// `target` must already be normalized by the caller. An empty target is
    /// treated as "not found" rather than a trivial match at offset 0. The
    /// search is a literal substring match, so a target that happens to be a
    /// substring of a longer word still matches.
    pub fn locate(index: &TokenIndex, target: &str) -> Option<usize> {
        if target.is_empty() {
            return None;
        }
        let offset = index.stream().find(target)?;
        index.owner_at(offset)
    }
}
