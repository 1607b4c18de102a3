// crates/slimvid-engine/src/playback.rs
//
// OutputPlayer: stateful sequential decoder for the preview monitor.
// Opened at a timestamp, then driven forward one frame at a time by the
// playback thread in worker.rs. Seeking is "re-open at the new position" —
// the UI's PTS gate absorbs the keyframe pre-roll.

use std::path::PathBuf;

use anyhow::Result;
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

/// Width of decoded preview frames. Sources narrower than this are kept at
/// their native width.
const PREVIEW_WIDTH: u32 = 640;

pub struct OutputPlayer {
    ictx:      ffmpeg::format::context::Input,
    decoder:   ffmpeg::decoder::video::Video,
    video_idx: usize,
    tb_num:    i32,
    tb_den:    i32,
    out_w:     u32,
    out_h:     u32,
    scaler:    SwsContext,
    last_pts:  i64,
}

impl OutputPlayer {
    /// Open `path` and seek to `timestamp` seconds (keyframe-aligned; the
    /// consumer fast-forwards the remainder).
    pub fn open(path: &PathBuf, timestamp: f64) -> Result<Self> {
        let mut ictx = input(path)?;
        let video_idx = ictx
            .streams()
            .best(Type::Video)
            .ok_or_else(|| anyhow::anyhow!("no video stream in output"))?
            .index();

        let (tb_num, tb_den, seek_ts, raw_w, raw_h) = {
            let stream = ictx.stream(video_idx).unwrap();
            let tb = stream.time_base();
            let seek_ts =
                (timestamp * tb.denominator() as f64 / tb.numerator() as f64) as i64;
            let params = stream.parameters();
            (
                tb.numerator(),
                tb.denominator(),
                seek_ts,
                params.width() as u32,
                params.height() as u32,
            )
        };

        let _ = ictx.seek(seek_ts, ..=seek_ts);

        // Second context for decoder construction (Parameters borrows from
        // the stream, which borrows from ictx).
        let ictx2   = input(path)?;
        let stream2 = ictx2.stream(video_idx).unwrap();
        let dec_ctx = ffmpeg::codec::context::Context::from_parameters(stream2.parameters())?;
        let decoder = dec_ctx.decoder().video()?;

        let out_w = raw_w.clamp(2, PREVIEW_WIDTH);
        let out_h = ((out_w as f64 * raw_h as f64 / raw_w.max(1) as f64) as u32)
            .max(2) & !1;

        let scaler = SwsContext::get(
            decoder.format(), decoder.width(), decoder.height(),
            Pixel::RGBA, out_w, out_h, Flags::BILINEAR,
        )?;

        Ok(Self {
            ictx, decoder, video_idx,
            tb_num, tb_den, out_w, out_h, scaler,
            last_pts: seek_ts,
        })
    }

    /// Decode the next frame sequentially. Returns de-strided RGBA pixels
    /// plus the frame's timestamp in seconds, or None at EOF.
    pub fn next_frame(&mut self) -> Option<(Vec<u8>, u32, u32, f64)> {
        for result in self.ictx.packets() {
            let Ok((stream, packet)) = result else { continue };
            if stream.index() != self.video_idx {
                continue;
            }
            if self.decoder.send_packet(&packet).is_err() {
                continue;
            }
            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                let ts_secs = pts as f64 * self.tb_num as f64 / self.tb_den as f64;

                let mut scaled = ffmpeg::util::frame::video::Video::empty();
                if self.scaler.run(&decoded, &mut scaled).is_err() {
                    return None;
                }
                // Copy only visible pixels, dropping the stride padding.
                let stride = scaled.stride(0);
                let raw    = scaled.data(0);
                let row    = self.out_w as usize * 4;
                let data: Vec<u8> = (0..self.out_h as usize)
                    .flat_map(|r| &raw[r * stride..r * stride + row])
                    .copied()
                    .collect();
                return Some((data, self.out_w, self.out_h, ts_secs));
            }
        }
        None
    }
}
