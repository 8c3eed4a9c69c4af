use std::path::Path;

/// Domain interface for cutting an audio file at a timestamp.
pub trait AudioTrimmer: Send {
    /// Produce a new file at `output` containing `source` from
    /// `start_seconds` onward.
    fn trim(
        &self,
        source: &Path,
        start_seconds: f64,
        output: &Path,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
