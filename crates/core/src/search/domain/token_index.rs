use crate::recognition::domain::token::Token;
use crate::search::domain::text_normalizer::normalize;

/// Concatenated normalized text of one transcribed segment, plus a parallel
/// map from each character position back to the token that produced it.
///
/// Built fresh per segment; never reused across segments. Invariant:
/// `stream.len() == owners.len()` at all times, and the stream is ASCII-only,
/// so a byte offset into `stream` indexes `owners` directly.
#[derive(Debug)]
pub struct TokenIndex {
    stream: String,
    owners: Vec<usize>,
}

impl TokenIndex {
    /// Concatenate the normalized text of every regular token in order.
    /// Special/control tokens and tokens with empty text contribute nothing.
    pub fn build(tokens: &[Token]) -> Self {
        let mut stream = String::new();
        let mut owners = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            if token.special || token.text.is_empty() {
                continue;
            }
            let cleaned = normalize(&token.text);
            for c in cleaned.chars() {
                stream.push(c);
                owners.push(index);
            }
        }

        Self { stream, owners }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Index of the token that contributed the character at `offset`.
    pub fn owner_at(&self, offset: usize) -> Option<usize> {
        self.owners.get(offset).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
