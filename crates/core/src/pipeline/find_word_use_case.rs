use std::path::Path;

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_segment::AudioSegment;
use crate::recognition::domain::speech_recognizer::SpeechRecognizer;
use crate::search::domain::text_normalizer::normalize;
use crate::search::domain::timestamp_resolver::TimestampResolver;
use crate::search::domain::token_index::TokenIndex;
use crate::search::domain::word_locator::WordLocator;
use crate::shared::constants::{DEFAULT_CHUNK_SECONDS, WHISPER_SAMPLE_RATE};
use crate::trim::domain::audio_trimmer::AudioTrimmer;
use crate::vad::domain::speech_segment::SpeechSegment;
use crate::vad::domain::voice_detector::VoiceDetector;

/// Knobs for the search loop. One pipeline covers all the tool's modes:
/// chunked or whole-file, with or without voice-activity gating.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Gate transcription on detected speech segments.
    pub use_vad: bool,
    /// Split the recording into fixed windows to bound per-call inference
    /// cost. None transcribes the whole recording in one pass.
    pub chunk_seconds: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            use_vad: true,
            chunk_seconds: Some(DEFAULT_CHUNK_SECONDS),
        }
    }
}

/// The resolved location of the first spoken occurrence of the target word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordMatch {
    /// Seconds from the start of the recording.
    pub start_seconds: f64,
}

/// Locates the first spoken occurrence of a word and trims the recording
/// to start there.
///
/// Chunks, VAD segments, transcribed sub-segments, and tokens are all walked
/// strictly in chronological order; the first match anywhere short-circuits
/// everything after it, so only the earliest occurrence is ever reported.
pub struct FindWordUseCase {
    reader: Box<dyn AudioReader>,
    detector: Box<dyn VoiceDetector>,
    recognizer: Box<dyn SpeechRecognizer>,
    trimmer: Box<dyn AudioTrimmer>,
    config: SearchConfig,
}

impl FindWordUseCase {
    pub fn new(
        reader: Box<dyn AudioReader>,
        detector: Box<dyn VoiceDetector>,
        recognizer: Box<dyn SpeechRecognizer>,
        trimmer: Box<dyn AudioTrimmer>,
        config: SearchConfig,
    ) -> Self {
        Self {
            reader,
            detector,
            recognizer,
            trimmer,
            config,
        }
    }

    /// Run the full pipeline. Returns `Ok(None)` when the word is never
    /// spoken; no output file is produced in that case.
    pub fn run(
        &self,
        source: &Path,
        word: &str,
        output: &Path,
    ) -> Result<Option<WordMatch>, Box<dyn std::error::Error>> {
        let target = normalize(word);
        if target.is_empty() {
            return Err(format!("Target word '{word}' has no alphanumeric characters").into());
        }

        let audio = self.reader.read_audio(source, WHISPER_SAMPLE_RATE)?;
        log::info!(
            "Decoded {:.1}s of audio from {}",
            audio.duration(),
            source.display()
        );

        match self.search(&audio, &target)? {
            Some(found) => {
                log::info!(
                    "Detected target word '{}' at {:.3} seconds",
                    target,
                    found.start_seconds
                );
                self.trimmer.trim(source, found.start_seconds, output)?;
                log::info!("Trimmed audio written to {}", output.display());
                Ok(Some(found))
            }
            None => {
                log::info!("Target word '{target}' not detected; no output file created");
                Ok(None)
            }
        }
    }

    /// Chronological scan over chunks and speech segments, stopping at the
    /// first match.
    fn search(
        &self,
        audio: &AudioSegment,
        target: &str,
    ) -> Result<Option<WordMatch>, Box<dyn std::error::Error>> {
        let samples = audio.samples();
        let rate = audio.sample_rate() as usize;
        let chunk_len = self
            .config
            .chunk_seconds
            .map(|secs| (secs as usize * rate).max(1))
            .unwrap_or_else(|| samples.len().max(1));

        let mut chunk_start = 0;
        while chunk_start < samples.len() {
            let chunk_end = (chunk_start + chunk_len).min(samples.len());
            let chunk = &samples[chunk_start..chunk_end];
            let chunk_offset_seconds = chunk_start as f64 / rate as f64;

            let segments = self.speech_segments(chunk, rate, chunk_offset_seconds);

            for segment in segments {
                if let Some(found) =
                    self.search_segment(chunk, rate, chunk_offset_seconds, segment, target)?
                {
                    return Ok(Some(found));
                }
            }

            chunk_start = chunk_end;
        }

        Ok(None)
    }

    /// Speech intervals to transcribe within one chunk. Without VAD the whole
    /// chunk is one segment. A failed detection skips the chunk rather than
    /// aborting the run.
    fn speech_segments(
        &self,
        chunk: &[f32],
        rate: usize,
        chunk_offset_seconds: f64,
    ) -> Vec<SpeechSegment> {
        if !self.config.use_vad {
            return vec![SpeechSegment {
                t0: 0,
                t1: chunk.len() as i64 * 100 / rate as i64,
            }];
        }

        match self.detector.detect(chunk) {
            Ok(segments) => segments,
            Err(e) => {
                log::warn!(
                    "Voice detection failed for chunk at {chunk_offset_seconds:.1}s, skipping: {e}"
                );
                Vec::new()
            }
        }
    }

    /// Transcribe one speech segment and search its token stream. A failed
    /// transcription is logged and skipped; the scan continues.
    fn search_segment(
        &self,
        chunk: &[f32],
        rate: usize,
        chunk_offset_seconds: f64,
        segment: SpeechSegment,
        target: &str,
    ) -> Result<Option<WordMatch>, Box<dyn std::error::Error>> {
        let start = (segment.t0.max(0) as usize).saturating_mul(rate) / 100;
        let end = ((segment.t1.max(0) as usize).saturating_mul(rate) / 100).min(chunk.len());
        if start >= chunk.len() || end <= start {
            return Ok(None);
        }

        let slice = &chunk[start..end];
        let token_segments = match self.recognizer.transcribe(slice) {
            Ok(segments) => segments,
            Err(e) => {
                let at = chunk_offset_seconds + segment.start_seconds();
                log::warn!("Transcription failed for segment at {at:.1}s, skipping: {e}");
                return Ok(None);
            }
        };

        for token_segment in &token_segments {
            // Per-segment state: the index is rebuilt from empty every time.
            let index = TokenIndex::build(&token_segment.tokens);
            if let Some(token_idx) = WordLocator::locate(&index, target) {
                let token = &token_segment.tokens[token_idx];
                let start_seconds =
                    TimestampResolver::resolve(chunk_offset_seconds, segment.t0, token.t0);
                return Ok(Some(WordMatch { start_seconds }));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::domain::token::{Token, TokenSegment};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // ─── Stubs ───

    struct StubReader {
        audio: AudioSegment,
    }

    impl AudioReader for StubReader {
        fn read_audio(
            &self,
            _: &Path,
            _: u32,
        ) -> Result<AudioSegment, Box<dyn std::error::Error>> {
            Ok(self.audio.clone())
        }

        fn audio_metadata(
            &self,
            _: &Path,
        ) -> Result<Option<(u32, u16)>, Box<dyn std::error::Error>> {
            Ok(Some((self.audio.sample_rate(), self.audio.channels())))
        }
    }

    struct StubDetector {
        segments: Vec<SpeechSegment>,
    }

    impl VoiceDetector for StubDetector {
        fn detect(&self, _: &[f32]) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>> {
            Ok(self.segments.clone())
        }
    }

    /// Returns one canned transcription per call, in order; counts calls.
    struct ScriptedRecognizer {
        responses: Mutex<Vec<Result<Vec<TokenSegment>, String>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedRecognizer {
        fn new(responses: Vec<Result<Vec<TokenSegment>, String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl SpeechRecognizer for ScriptedRecognizer {
        fn transcribe(
            &self,
            _: &[f32],
        ) -> Result<Vec<TokenSegment>, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Ok(Vec::new());
            }
            responses.remove(0).map_err(|e| e.into())
        }
    }

    struct RecordingTrimmer {
        requested: Arc<Mutex<Option<(f64, String)>>>,
    }

    impl AudioTrimmer for RecordingTrimmer {
        fn trim(
            &self,
            _: &Path,
            start_seconds: f64,
            output: &Path,
        ) -> Result<(), Box<dyn std::error::Error>> {
            *self.requested.lock().unwrap() =
                Some((start_seconds, output.display().to_string()));
            Ok(())
        }
    }

    fn tokens(words: &[(&str, i64)]) -> Vec<TokenSegment> {
        vec![TokenSegment {
            tokens: words
                .iter()
                .map(|&(text, t0)| Token {
                    id: 1,
                    text: text.to_string(),
                    special: false,
                    t0,
                })
                .collect(),
        }]
    }

    fn audio_seconds(secs: usize) -> AudioSegment {
        AudioSegment::new(vec![0.1; secs * 16000], 16000, 1)
    }

    fn use_case(
        audio: AudioSegment,
        segments: Vec<SpeechSegment>,
        recognizer: ScriptedRecognizer,
        config: SearchConfig,
    ) -> (FindWordUseCase, Arc<Mutex<Option<(f64, String)>>>, Arc<AtomicUsize>) {
        let requested = Arc::new(Mutex::new(None));
        let calls = recognizer.calls.clone();
        let uc = FindWordUseCase::new(
            Box::new(StubReader { audio }),
            Box::new(StubDetector { segments }),
            Box::new(recognizer),
            Box::new(RecordingTrimmer {
                requested: requested.clone(),
            }),
            config,
        );
        (uc, requested, calls)
    }

    #[test]
    fn test_match_triggers_trim_at_resolved_timestamp() {
        // Single 10s chunk, one segment starting 2.5s in, token 1.2s into it
        let recognizer = ScriptedRecognizer::new(vec![Ok(tokens(&[(" hello", 120)]))]);
        let (uc, requested, _) = use_case(
            audio_seconds(10),
            vec![SpeechSegment { t0: 250, t1: 600 }],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "hello", Path::new("out.opus"))
            .unwrap();

        let found = result.unwrap();
        assert!((found.start_seconds - 3.7).abs() < 1e-9);
        let requested = requested.lock().unwrap();
        let (start, output) = requested.as_ref().unwrap();
        assert!((start - 3.7).abs() < 1e-9);
        assert_eq!(output, "out.opus");
    }

    #[test]
    fn test_chunk_offset_feeds_into_timestamp() {
        // 70s recording, 30s chunks. No speech in the first two chunks; a
        // match in the third chunk (offset 60s) at segment 1.0s, token 0.5s.
        let recognizer = ScriptedRecognizer::new(vec![
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(tokens(&[(" go", 50)])),
        ]);
        let (uc, _, _) = use_case(
            audio_seconds(70),
            vec![SpeechSegment { t0: 100, t1: 400 }],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "go", Path::new("out.opus"))
            .unwrap();

        assert!((result.unwrap().start_seconds - 61.5).abs() < 1e-9);
    }

    #[test]
    fn test_first_match_short_circuits_later_segments() {
        // The word occurs in the first and third segments; only the first
        // should ever be transcribed once a match lands.
        let recognizer = ScriptedRecognizer::new(vec![
            Ok(tokens(&[(" stop", 10)])),
            Ok(tokens(&[(" other", 0)])),
            Ok(tokens(&[(" stop", 0)])),
        ]);
        let (uc, _, calls) = use_case(
            audio_seconds(10),
            vec![
                SpeechSegment { t0: 0, t1: 200 },
                SpeechSegment { t0: 300, t1: 500 },
                SpeechSegment { t0: 600, t1: 800 },
            ],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "stop", Path::new("out.opus"))
            .unwrap();

        assert!((result.unwrap().start_seconds - 0.1).abs() < 1e-9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_match_returns_none_and_never_trims() {
        let recognizer = ScriptedRecognizer::new(vec![Ok(tokens(&[(" hello", 0)]))]);
        let (uc, requested, _) = use_case(
            audio_seconds(5),
            vec![SpeechSegment { t0: 0, t1: 500 }],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "absent", Path::new("out.opus"))
            .unwrap();

        assert!(result.is_none());
        assert!(requested.lock().unwrap().is_none());
    }

    #[test]
    fn test_failed_segment_is_skipped_and_later_match_found() {
        let recognizer = ScriptedRecognizer::new(vec![
            Err("inference failed".to_string()),
            Ok(tokens(&[(" target", 0)])),
        ]);
        let (uc, _, calls) = use_case(
            audio_seconds(10),
            vec![
                SpeechSegment { t0: 0, t1: 200 },
                SpeechSegment { t0: 300, t1: 500 },
            ],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "target", Path::new("out.opus"))
            .unwrap();

        assert!((result.unwrap().start_seconds - 3.0).abs() < 1e-9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_without_vad_whole_chunk_is_transcribed() {
        let recognizer = ScriptedRecognizer::new(vec![Ok(tokens(&[(" word", 200)]))]);
        let (uc, _, _) = use_case(
            audio_seconds(10),
            Vec::new(), // detector output irrelevant when VAD is off
            recognizer,
            SearchConfig {
                use_vad: false,
                chunk_seconds: Some(30),
            },
        );

        let result = uc
            .run(Path::new("in.opus"), "word", Path::new("out.opus"))
            .unwrap();

        assert!((result.unwrap().start_seconds - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unchunked_search_covers_whole_recording() {
        let recognizer = ScriptedRecognizer::new(vec![Ok(tokens(&[(" deep", 4000)]))]);
        let (uc, _, calls) = use_case(
            audio_seconds(90),
            Vec::new(),
            recognizer,
            SearchConfig {
                use_vad: false,
                chunk_seconds: None,
            },
        );

        let result = uc
            .run(Path::new("in.opus"), "deep", Path::new("out.opus"))
            .unwrap();

        // One transcription call over the whole 90s buffer
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!((result.unwrap().start_seconds - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_outside_chunk_bounds_is_ignored() {
        let recognizer = ScriptedRecognizer::new(vec![Ok(tokens(&[(" word", 0)]))]);
        let (uc, _, calls) = use_case(
            audio_seconds(5),
            vec![SpeechSegment { t0: 900, t1: 1200 }], // past the 5s buffer
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "word", Path::new("out.opus"))
            .unwrap();

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_target_normalized_before_search() {
        let recognizer = ScriptedRecognizer::new(vec![Ok(tokens(&[(" Hello,", 30)]))]);
        let (uc, _, _) = use_case(
            audio_seconds(5),
            vec![SpeechSegment { t0: 0, t1: 500 }],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "HELLO!", Path::new("out.opus"))
            .unwrap();

        assert!(result.is_some());
    }

    #[test]
    fn test_target_with_no_alphanumeric_is_an_error() {
        let recognizer = ScriptedRecognizer::new(vec![]);
        let (uc, _, _) = use_case(
            audio_seconds(5),
            vec![SpeechSegment { t0: 0, t1: 500 }],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc.run(Path::new("in.opus"), "?!", Path::new("out.opus"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_recording_finds_nothing() {
        let recognizer = ScriptedRecognizer::new(vec![]);
        let (uc, requested, calls) = use_case(
            AudioSegment::new(Vec::new(), 16000, 1),
            vec![SpeechSegment { t0: 0, t1: 100 }],
            recognizer,
            SearchConfig::default(),
        );

        let result = uc
            .run(Path::new("in.opus"), "word", Path::new("out.opus"))
            .unwrap();

        assert!(result.is_none());
        assert!(requested.lock().unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
