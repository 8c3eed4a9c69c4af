use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use wordtrim_core::audio::domain::audio_reader::AudioReader;
use wordtrim_core::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use wordtrim_core::pipeline::find_word_use_case::{FindWordUseCase, SearchConfig};
use wordtrim_core::recognition::infrastructure::whisper_recognizer::WhisperRecognizer;
use wordtrim_core::shared::constants::{
    DEFAULT_BEAM_SIZE, DEFAULT_CHUNK_SECONDS, WHISPER_MODEL_NAME, WHISPER_MODEL_URL,
    WHISPER_SAMPLE_RATE,
};
use wordtrim_core::shared::model_resolver;
use wordtrim_core::trim::infrastructure::ffmpeg_trimmer::FfmpegTrimmer;
use wordtrim_core::vad::infrastructure::energy_vad::{EnergyVad, DEFAULT_RMS_THRESHOLD};

/// Locate the first spoken occurrence of a word and trim the audio to it.
#[derive(Parser)]
#[command(name = "wordtrim")]
struct Cli {
    /// Input audio file.
    audio_file: PathBuf,

    /// Word to locate (matched case- and punctuation-insensitively).
    word: String,

    /// Output file (default: "<input stem>-trimmed.<input extension>").
    #[arg(long)]
    output: Option<PathBuf>,

    /// Whisper model path (default: cached tiny.en, downloaded if missing).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Inference threads (default: all available cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Beam size for beam-search decoding.
    #[arg(long, default_value_t = DEFAULT_BEAM_SIZE)]
    beam_size: usize,

    /// Chunk length in seconds; 0 transcribes the recording in one pass.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SECONDS)]
    chunk_seconds: u32,

    /// Transcribe whole chunks instead of gating on detected speech.
    #[arg(long)]
    no_vad: bool,

    /// RMS threshold for the voice-activity detector (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_RMS_THRESHOLD)]
    vad_threshold: f32,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let model_path = match &cli.model {
        Some(path) => path.clone(),
        None => {
            log::info!("Resolving model: {WHISPER_MODEL_NAME}");
            let path = model_resolver::resolve(
                WHISPER_MODEL_NAME,
                WHISPER_MODEL_URL,
                None,
                Some(Box::new(download_progress)),
            )?;
            eprintln!();
            path
        }
    };

    let threads = cli.threads.unwrap_or_else(available_threads);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.audio_file));

    let reader = FfmpegAudioReader;
    if let Some((rate, channels)) = reader.audio_metadata(&cli.audio_file)? {
        log::info!(
            "Input: {} ({rate} Hz, {channels} ch), resampling to {WHISPER_SAMPLE_RATE} Hz mono",
            cli.audio_file.display()
        );
    }

    let recognizer = WhisperRecognizer::new(&model_path, threads, cli.beam_size)?;
    let detector = EnergyVad::new(WHISPER_SAMPLE_RATE, cli.vad_threshold);

    let config = SearchConfig {
        use_vad: !cli.no_vad,
        chunk_seconds: match cli.chunk_seconds {
            0 => None,
            secs => Some(secs),
        },
    };

    let use_case = FindWordUseCase::new(
        Box::new(reader),
        Box::new(detector),
        Box::new(recognizer),
        Box::new(FfmpegTrimmer),
        config,
    );

    match use_case.run(&cli.audio_file, &cli.word, &output)? {
        Some(found) => {
            eprintln!(
                "Detected '{}' at {:.3}s; wrote {}",
                cli.word,
                found.start_seconds,
                output.display()
            );
        }
        None => {
            eprintln!("Word '{}' not detected; no output file created", cli.word);
        }
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.audio_file.exists() {
        return Err(format!("Input file not found: {}", cli.audio_file.display()).into());
    }
    if cli.beam_size == 0 {
        return Err("Beam size must be at least 1".into());
    }
    if let Some(0) = cli.threads {
        return Err("Thread count must be at least 1".into());
    }
    if !(0.0..=1.0).contains(&cli.vad_threshold) {
        return Err(format!(
            "VAD threshold must be between 0.0 and 1.0, got {}",
            cli.vad_threshold
        )
        .into());
    }
    Ok(())
}

/// `name-trimmed.ext` next to the input file.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-trimmed.{ext}"),
        None => format!("{stem}-trimmed"),
    };
    input.with_file_name(name)
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech model... {pct}%");
    } else {
        eprint!("\rDownloading speech model... {downloaded} bytes");
    }
}
