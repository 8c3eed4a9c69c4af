/// Centisecond unit used by VAD segments and token timestamps.
const CENTIS_PER_SECOND: f64 = 100.0;

pub struct TimestampResolver;

impl TimestampResolver {
    /// Convert a token start time into an absolute recording timestamp.
    ///
    /// The engine reports token times relative to the slice it transcribed,
    /// which is itself a VAD segment offset within a fixed chunk of the
    /// recording. All three levels must be summed: recording -> chunk ->
    /// segment -> token. `segment_t0` and `token_t0` are in hundredths of a
    /// second; the result is in seconds.
    pub fn resolve(chunk_offset_seconds: f64, segment_t0: i64, token_t0: i64) -> f64 {
        chunk_offset_seconds + (segment_t0 + token_t0) as f64 / CENTIS_PER_SECOND
    }
}
