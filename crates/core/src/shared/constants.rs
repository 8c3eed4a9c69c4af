pub const WHISPER_MODEL_NAME: &str = "ggml-tiny.en.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.en.bin";

/// Sample rate expected by the Whisper encoder.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Chunk length fed to VAD and transcription when chunking is enabled.
pub const DEFAULT_CHUNK_SECONDS: u32 = 30;

pub const DEFAULT_BEAM_SIZE: usize = 5;
