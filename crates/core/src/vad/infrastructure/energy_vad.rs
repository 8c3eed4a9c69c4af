use crate::vad::domain::speech_segment::SpeechSegment;
use crate::vad::domain::voice_detector::VoiceDetector;

pub const DEFAULT_RMS_THRESHOLD: f32 = 0.01;

/// Frame length in milliseconds for energy classification.
const FRAME_MS: u32 = 30;

/// Voiced runs separated by a gap of at most this many frames are merged.
const HANG_FRAMES: usize = 10;

/// Energy-based voice-activity detector.
///
/// Splits the buffer into 30 ms frames and classifies each frame as voiced
/// when its RMS amplitude exceeds the configured threshold. Consecutive voiced
/// frames form a speech segment; short unvoiced gaps are bridged so one
/// utterance does not splinter into many segments at word boundaries.
pub struct EnergyVad {
    sample_rate: u32,
    rms_threshold: f32,
    frame_size: usize,
}

impl EnergyVad {
    /// `rms_threshold` should be in `[0.0, 1.0]`; 0.01 suits a quiet room,
    /// 0.02-0.05 suits noisy recordings.
    pub fn new(sample_rate: u32, rms_threshold: f32) -> Self {
        let frame_size = (sample_rate as usize * FRAME_MS as usize / 1000).max(1);
        Self {
            sample_rate,
            rms_threshold,
            frame_size,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.rms_threshold
    }

    fn is_voiced(&self, frame: &[f32]) -> bool {
        if frame.is_empty() {
            return false;
        }
        let mean_sq: f32 = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
        mean_sq.sqrt() > self.rms_threshold
    }

    fn centis_at_sample(&self, sample: usize) -> i64 {
        sample as i64 * 100 / self.sample_rate as i64
    }
}

impl VoiceDetector for EnergyVad {
    fn detect(&self, samples: &[f32]) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let frame_size = self.frame_size;
        let total_frames = samples.len().div_ceil(frame_size);

        let mut segments = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut last_voiced: usize = 0;

        for i in 0..total_frames {
            let s = i * frame_size;
            let e = ((i + 1) * frame_size).min(samples.len());
            let voiced = self.is_voiced(&samples[s..e]);

            match (voiced, run_start) {
                (true, None) => {
                    run_start = Some(i);
                    last_voiced = i;
                }
                (true, Some(_)) => {
                    last_voiced = i;
                }
                (false, Some(start)) => {
                    if i - last_voiced > HANG_FRAMES {
                        segments.push(self.segment_from_frames(start, last_voiced, samples.len()));
                        run_start = None;
                    }
                }
                (false, None) => {}
            }
        }

        if let Some(start) = run_start {
            segments.push(self.segment_from_frames(start, last_voiced, samples.len()));
        }

        Ok(segments)
    }
}

impl EnergyVad {
    fn segment_from_frames(
        &self,
        first_frame: usize,
        last_frame: usize,
        buffer_len: usize,
    ) -> SpeechSegment {
        let start_sample = first_frame * self.frame_size;
        let end_sample = ((last_frame + 1) * self.frame_size).min(buffer_len);
        SpeechSegment {
            t0: self.centis_at_sample(start_sample),
            t1: self.centis_at_sample(end_sample),
        }
    }
}
