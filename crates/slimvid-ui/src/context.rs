// crates/slimvid-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of SessionState:
// the engine worker and the preview frame plumbing. SlimVidApp holds one
// of these plus a SessionState and the panes — nothing else.

use eframe::egui;
use slimvid_core::state::{OutputInfo, SessionState, WorkflowPhase};
use slimvid_engine::{EngineEvent, EngineWorker, PlaybackFrame};

use crate::helpers::format::format_size;

pub struct AppContext {
    pub engine_worker: EngineWorker,

    /// Latest promoted preview frame. Survives across ticks so decode
    /// latency after a seek never blanks the monitor.
    pub frame_tex: Option<egui::TextureHandle>,

    /// Next-to-display playback frame, held until its PTS is due.
    /// Prevents the drain-all pattern from racing ahead of wall-clock time.
    pending_pb_frame: Option<PlaybackFrame>,
}

impl AppContext {
    pub fn new(engine_worker: EngineWorker) -> Self {
        Self {
            engine_worker,
            frame_tex:        None,
            pending_pb_frame: None,
        }
    }

    /// Drop all preview plumbing — called on reset and on new selection.
    pub fn clear_preview(&mut self) {
        self.engine_worker.stop_playback();
        self.frame_tex        = None;
        self.pending_pb_frame = None;
    }

    /// Forget the held frame ordering state after a seek so the gate doesn't
    /// reject the first frame from the new position.
    pub fn flush_pending_frame(&mut self) {
        self.pending_pb_frame = None;
    }

    /// Drain the EngineWorker result channel into SessionState. Called once
    /// per frame from app::update, before the panels are built. This is the
    /// single translation layer between raw worker output and UI-visible
    /// state.
    pub fn ingest_engine_events(&mut self, state: &mut SessionState, ctx: &egui::Context) {
        while let Ok(event) = self.engine_worker.rx.try_recv() {
            match event {
                EngineEvent::JobProgress { job_id, fraction } => {
                    state.apply_progress(job_id, fraction);
                    ctx.request_repaint();
                }

                EngineEvent::JobDone { job_id, path, bytes, duration, video_size } => {
                    if state.active_job != Some(job_id) {
                        // A superseded job finishing late — nothing owns its
                        // staging directory anymore, so drop it now.
                        self.engine_worker.discard_job(job_id);
                        continue;
                    }
                    eprintln!("[app] job {job_id} done → {}", path.display());
                    state.complete(OutputInfo {
                        job_id,
                        path: path.clone(),
                        bytes,
                        duration,
                        video_size,
                    });
                    // Paint the first frame as a poster while the transport
                    // sits paused at 0:00.
                    self.engine_worker.start_playback(path, 0.0);
                    ctx.request_repaint();
                }

                EngineEvent::JobError { job_id, msg } => {
                    eprintln!("[app] job {job_id} failed: {msg}");
                    state.fail(job_id, msg);
                    ctx.request_repaint();
                }

                EngineEvent::CopySaved { path } => {
                    let name = path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "copy".into());
                    state.save_status = Some(format!("✓ Saved: {name}"));
                    ctx.request_repaint();
                }

                EngineEvent::CopyError { msg } => {
                    state.save_status = Some(format!("✗ {msg}"));
                    ctx.request_repaint();
                }
            }
        }
    }

    /// PTS-gated preview frame consumption. The decode thread pre-fills a
    /// bounded channel as fast as FFmpeg can go; draining it all and showing
    /// the last frame would play at decode speed. Instead a one-slot pending
    /// buffer promotes a frame only once the playhead has caught up to its
    /// timestamp.
    pub fn poll_playback(&mut self, state: &SessionState, ctx: &egui::Context) {
        if state.phase != WorkflowPhase::Previewing {
            return;
        }

        // Step 1: fill the pending slot if empty.
        if self.pending_pb_frame.is_none() {
            if let Ok(f) = self.engine_worker.pb_rx.try_recv() {
                self.pending_pb_frame = Some(f);
            }
        }

        // Step 2: fast-forward past overdue frames (keyframe pre-roll after
        // a seek lands here and is skipped in one tick).
        while self
            .pending_pb_frame
            .as_ref()
            .map(|f| f.timestamp < state.playhead - (1.0 / 30.0))
            .unwrap_or(false)
        {
            match self.engine_worker.pb_rx.try_recv() {
                Ok(newer) => self.pending_pb_frame = Some(newer),
                Err(_)    => break,
            }
        }

        // Step 3: promote the pending frame when its PTS is due. While
        // paused only the poster/seek frame (timestamp at or before the
        // playhead) qualifies.
        let due = self
            .pending_pb_frame
            .as_ref()
            .map(|f| f.timestamp <= state.playhead + (1.0 / 60.0))
            .unwrap_or(false);

        if due {
            if let Some(f) = self.pending_pb_frame.take() {
                let tex = ctx.load_texture(
                    "preview-frame",
                    egui::ColorImage::from_rgba_unmultiplied(
                        [f.width as usize, f.height as usize],
                        &f.data,
                    ),
                    egui::TextureOptions::LINEAR,
                );
                self.frame_tex = Some(tex);
                ctx.request_repaint();
                // Pre-pull the next frame so it's ready for the next tick.
                if let Ok(next) = self.engine_worker.pb_rx.try_recv() {
                    self.pending_pb_frame = Some(next);
                }
            }
        }
    }
}

/// Compression summary line for the preview pane: "2.1 MB → 840.0 KB (39%)".
pub fn compression_summary(input_bytes: u64, output_bytes: u64) -> String {
    if input_bytes == 0 {
        return format_size(output_bytes);
    }
    let pct = (output_bytes as f64 / input_bytes as f64 * 100.0).round() as u64;
    format!(
        "{} → {} ({pct}%)",
        format_size(input_bytes),
        format_size(output_bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::compression_summary;

    #[test]
    fn summary_shows_both_sizes_and_the_ratio() {
        assert_eq!(
            compression_summary(2 * 1024 * 1024, 1024 * 1024),
            "2.0 MB → 1.0 MB (50%)"
        );
    }

    #[test]
    fn zero_input_degrades_to_the_output_size() {
        assert_eq!(compression_summary(0, 2048), "2.0 KB");
    }
}
