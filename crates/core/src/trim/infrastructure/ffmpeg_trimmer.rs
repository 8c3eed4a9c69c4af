use std::path::Path;

use crate::trim::domain::audio_trimmer::AudioTrimmer;

/// Cuts an audio file by stream-copy remuxing with ffmpeg-next.
///
/// Seeks the demuxer to the requested start, then copies packets into the
/// output container without re-encoding. The output format is chosen by the
/// output path's extension, matching the source codec's defaults.
pub struct FfmpegTrimmer;

impl AudioTrimmer for FfmpegTrimmer {
    fn trim(
        &self,
        source: &Path,
        start_seconds: f64,
        output: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(source)?;
        let mut octx = ffmpeg_next::format::output(output)?;

        // Map every copyable input stream to an output stream.
        let mut stream_mapping: Vec<isize> = vec![-1; ictx.nb_streams() as usize];
        let mut input_time_bases = vec![ffmpeg_next::Rational(0, 1); ictx.nb_streams() as usize];
        let mut next_output_index: isize = 0;

        for (i, stream) in ictx.streams().enumerate() {
            let medium = stream.parameters().medium();
            if medium != ffmpeg_next::media::Type::Audio
                && medium != ffmpeg_next::media::Type::Video
                && medium != ffmpeg_next::media::Type::Subtitle
            {
                continue;
            }

            stream_mapping[i] = next_output_index;
            input_time_bases[i] = stream.time_base();

            let mut ost =
                octx.add_stream(ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::None))?;
            ost.set_parameters(stream.parameters());
            unsafe {
                (*ost.parameters().as_mut_ptr()).codec_tag = 0;
            }
            next_output_index += 1;
        }

        if next_output_index == 0 {
            return Err(format!("No copyable streams in {}", source.display()).into());
        }

        let position =
            (start_seconds * f64::from(ffmpeg_next::ffi::AV_TIME_BASE)) as i64;
        ictx.seek(position, ..position)?;

        octx.write_header()?;

        for (stream, mut packet) in ictx.packets() {
            let input_index = stream.index();
            let output_index = stream_mapping[input_index];
            if output_index < 0 {
                continue;
            }

            let ost_time_base = octx
                .stream(output_index as usize)
                .ok_or("Output stream missing")?
                .time_base();
            packet.rescale_ts(input_time_bases[input_index], ost_time_base);
            packet.set_position(-1);
            packet.set_stream(output_index as usize);
            packet.write_interleaved(&mut octx)?;
        }

        octx.write_trailer()?;
        Ok(())
    }
}
