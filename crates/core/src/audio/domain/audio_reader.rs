use crate::audio::domain::audio_segment::AudioSegment;
use std::path::Path;

/// Domain interface for decoding an audio file.
pub trait AudioReader: Send {
    /// Decode the audio track to a mono PCM AudioSegment at the given sample rate.
    /// Errors if the file cannot be opened, decoded, or has no audio stream.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioSegment, Box<dyn std::error::Error>>;

    /// Return the original audio sample rate and channel count without decoding.
    /// Returns None if the file has no audio stream.
    fn audio_metadata(&self, path: &Path)
        -> Result<Option<(u32, u16)>, Box<dyn std::error::Error>>;
}
