/// A detected speech interval `[t0, t1)` in hundredths of a second,
/// relative to the buffer it was detected in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeechSegment {
    pub t0: i64,
    pub t1: i64,
}

impl SpeechSegment {
    pub fn start_seconds(&self) -> f64 {
        self.t0 as f64 / 100.0
    }

    pub fn end_seconds(&self) -> f64 {
        self.t1 as f64 / 100.0
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.t1 - self.t0) as f64 / 100.0
    }
}
