use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::recognition::domain::speech_recognizer::SpeechRecognizer;
use crate::recognition::domain::token::{Token, TokenSegment};

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// The model is loaded once at construction; each `transcribe` call creates a
/// fresh inference state, so per-segment calls never see each other's context.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
    threads: i32,
    beam_size: i32,
}

impl std::fmt::Debug for WhisperRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperRecognizer")
            .field("threads", &self.threads)
            .field("beam_size", &self.beam_size)
            .finish_non_exhaustive()
    }
}

impl WhisperRecognizer {
    pub fn new(
        model_path: &Path,
        threads: usize,
        beam_size: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }

        let ctx = WhisperContext::new_with_params(
            model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        Ok(Self {
            ctx,
            threads: threads.max(1) as i32,
            beam_size: beam_size.max(1) as i32,
        })
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        samples: &[f32],
    ) -> Result<Vec<TokenSegment>, Box<dyn std::error::Error>> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: self.beam_size,
            patience: -1.0,
        });
        params.set_language(Some("auto"));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_no_context(true);
        params.set_suppress_blank(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(self.threads);

        state
            .full(params, samples)
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        // Token ids at or above this boundary are control tokens.
        let special_boundary = self.ctx.token_beg();

        let mut segments = Vec::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let mut tokens = Vec::new();
            let n_tokens = segment.n_tokens();
            for tok_idx in 0..n_tokens {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };

                let data = token.token_data();
                // Undecodable byte-fragment tokens stay in the list as empty
                // text so token indices keep matching the engine's ordering.
                let text = token.to_str().unwrap_or_default().to_string();

                tokens.push(Token {
                    id: data.id,
                    text,
                    special: data.id >= special_boundary,
                    t0: data.t0,
                });
            }

            segments.push(TokenSegment { tokens });
        }

        Ok(segments)
    }
}
