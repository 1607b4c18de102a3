// crates/slimvid-engine/src/probe.rs
//
// In-process FFmpeg probing: duration and video dimensions. Used for the
// progress denominator before a run and for the preview stats afterwards.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

pub struct MediaInfo {
    pub duration:   f64,
    /// Display dimensions of the best video stream; None for audio-only files.
    pub video_size: Option<(u32, u32)>,
}

pub fn probe_media(path: &PathBuf) -> Result<MediaInfo> {
    let ictx = input(path).with_context(|| format!("open {}", path.display()))?;

    // Container duration first; fall back to the best stream's duration for
    // containers that don't carry one.
    let mut duration = ictx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
    if duration <= 0.0 {
        if let Some(stream) = ictx
            .streams()
            .best(Type::Video)
            .or_else(|| ictx.streams().best(Type::Audio))
        {
            let tb = stream.time_base();
            duration = stream.duration() as f64 * tb.numerator() as f64
                / tb.denominator() as f64;
        }
    }
    if duration <= 0.0 {
        bail!("duration unknown for {}", path.display());
    }

    // AVCodecParameters carry the display dimensions (no macroblock padding).
    let video_size = ictx.streams().best(Type::Video).and_then(|stream| {
        let params = stream.parameters();
        let (w, h) = (params.width() as u32, params.height() as u32);
        (w > 0 && h > 0).then_some((w, h))
    });

    eprintln!(
        "[engine] probed {:.2}s {:?} ← {}",
        duration,
        video_size,
        path.display()
    );
    Ok(MediaInfo { duration, video_size })
}
