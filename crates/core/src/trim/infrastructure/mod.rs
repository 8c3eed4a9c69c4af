pub mod ffmpeg_trimmer;
