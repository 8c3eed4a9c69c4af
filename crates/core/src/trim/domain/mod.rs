pub mod audio_trimmer;
