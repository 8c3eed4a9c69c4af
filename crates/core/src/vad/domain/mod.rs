pub mod speech_segment;
pub mod voice_detector;
