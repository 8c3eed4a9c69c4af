use super::speech_segment::SpeechSegment;

/// Domain interface for voice-activity detection.
///
/// Implementations classify a mono PCM buffer into ordered speech intervals.
pub trait VoiceDetector: Send {
    /// Detect speech segments in `samples`. Segments are returned in
    /// chronological order with timestamps relative to the input buffer;
    /// the result may be empty when no speech is present.
    fn detect(&self, samples: &[f32]) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>>;
}
