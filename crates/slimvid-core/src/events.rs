// crates/slimvid-core/src/events.rs
//
// Types that flow across the channels between slimvid-engine and slimvid-ui.
// No egui, no ffmpeg — just plain data.

use std::path::PathBuf;
use uuid::Uuid;

/// Results sent from the EngineWorker background threads to the UI.
pub enum EngineEvent {
    /// Fractional completion in [0, 1] for the running job.
    JobProgress {
        job_id:   Uuid,
        fraction: f64,
    },
    /// The transcode finished and the output was read back and probed.
    JobDone {
        job_id:     Uuid,
        path:       PathBuf,
        bytes:      u64,
        duration:   f64,
        video_size: Option<(u32, u32)>,
    },
    /// The engine (or its loading) failed. `msg` is user-presentable.
    JobError {
        job_id: Uuid,
        msg:    String,
    },
    /// "Save a copy…" finished.
    CopySaved { path: PathBuf },
    CopyError { msg: String },
}

/// A decoded frame from the preview playback pipeline. RGBA, de-strided.
pub struct PlaybackFrame {
    pub timestamp: f64,
    pub width:     u32,
    pub height:    u32,
    pub data:      Vec<u8>,
}
