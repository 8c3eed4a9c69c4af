pub mod audio;
pub mod pipeline;
pub mod recognition;
pub mod search;
pub mod shared;
pub mod trim;
pub mod vad;
