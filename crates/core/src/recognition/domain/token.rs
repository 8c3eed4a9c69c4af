/// One recognized token as emitted by the transcription engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Engine vocabulary id.
    pub id: i32,
    /// Raw token text; may be empty when the engine emitted undecodable bytes.
    pub text: String,
    /// True for control tokens (timestamps, markers) that carry no speech text.
    pub special: bool,
    /// Start time in hundredths of a second, relative to the transcribed slice.
    pub t0: i64,
}

/// An ordered run of tokens recognized as one sub-segment of the input slice.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenSegment {
    pub tokens: Vec<Token>,
}
