use super::token::TokenSegment;

/// Domain interface for speech-to-text transcription.
///
/// Implementations run inference on a mono 16 kHz PCM slice and produce
/// token-level timestamped output, in emission order. Each call is an opaque,
/// blocking operation with no partial results.
pub trait SpeechRecognizer: Send {
    fn transcribe(
        &self,
        samples: &[f32],
    ) -> Result<Vec<TokenSegment>, Box<dyn std::error::Error>>;
}
