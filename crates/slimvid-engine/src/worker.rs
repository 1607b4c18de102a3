// crates/slimvid-engine/src/worker.rs
//
// EngineWorker: owns the engine singleton, the job thread, and the preview
// playback thread. All public API that slimvid-ui calls lives here.
//
// Engine lifecycle: the FfmpegEngine is created at most once per app
// lifetime — lazily, by the job thread, on the first run — and reused by
// every subsequent run. shutdown() drops it, which removes the staging
// root. Nothing else constructs an engine.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use uuid::Uuid;

use slimvid_core::events::{EngineEvent, PlaybackFrame};
use slimvid_core::request::{EncodeRequest, OUTPUT_NAME};

use crate::engine::{EngineConfig, FfmpegEngine};
use crate::playback::OutputPlayer;
use crate::probe::probe_media;

// ── Internal types ────────────────────────────────────────────────────────────

/// Everything needed to run one transcode.
pub struct TranscodeJob {
    pub job_id:              Uuid,
    pub input_path:          PathBuf,
    /// Plain filename; the input stages under this name in the engine's
    /// job directory and the argv references it verbatim.
    pub input_name:          String,
    pub target_bitrate_kbps: u32,
}

enum JobCmd {
    Run(TranscodeJob),
    Discard(Uuid),
}

enum PlaybackCmd {
    Start { path: PathBuf, ts: f64 },
    Stop,
}

type EngineSlot = Arc<Mutex<Option<Arc<FfmpegEngine>>>>;

/// Guarded accessor for the engine singleton: loads on first use, hands out
/// the same instance for every later call. shutdown() empties the slot.
fn ensure_engine(slot: &EngineSlot, config: &EngineConfig) -> Result<Arc<FfmpegEngine>> {
    let mut guard = slot.lock();
    if let Some(engine) = guard.as_ref() {
        return Ok(Arc::clone(engine));
    }
    let engine = Arc::new(FfmpegEngine::load(config.clone())?);
    *guard = Some(Arc::clone(&engine));
    Ok(engine)
}

// ── EngineWorker ──────────────────────────────────────────────────────────────

pub struct EngineWorker {
    /// Shared result channel: job progress / done / error, copy results.
    pub rx:    Receiver<EngineEvent>,
    tx:        Sender<EngineEvent>,

    job_tx:    Sender<JobCmd>,

    /// Preview playback pipeline. Frames arrive on pb_rx ahead of wall-clock
    /// time; the UI promotes them when their PTS is due.
    pb_tx:     Sender<PlaybackCmd>,
    pub pb_rx: Receiver<PlaybackFrame>,

    engine:    EngineSlot,
    shutdown:  Arc<AtomicBool>,
}

impl EngineWorker {
    pub fn new(config: EngineConfig) -> Self {
        let (tx, rx)         = bounded::<EngineEvent>(256);
        let (job_tx, job_rx) = bounded::<JobCmd>(8);

        let engine: EngineSlot = Arc::new(Mutex::new(None));
        let shutdown           = Arc::new(AtomicBool::new(false));

        // ── Job thread ────────────────────────────────────────────────────
        // Strictly sequential: one transcode at a time, in command order.
        let slot   = Arc::clone(&engine);
        let job_tx_events = tx.clone();
        let sd     = Arc::clone(&shutdown);
        thread::spawn(move || {
            while let Ok(cmd) = job_rx.recv() {
                match cmd {
                    JobCmd::Run(job) => {
                        if sd.load(Ordering::Relaxed) {
                            return;
                        }
                        run_job(&slot, &config, job, &job_tx_events);
                    }
                    JobCmd::Discard(id) => {
                        let engine = slot.lock().as_ref().map(Arc::clone);
                        if let Some(engine) = engine {
                            engine.remove_job(id);
                        }
                    }
                }
            }
        });

        // ── Preview playback thread ───────────────────────────────────────
        // Decodes ahead of the UI into a bounded channel; the blocking send
        // is the rate limiter. 32 frames ≈ 1 s of lookahead at 30 fps.
        let (pb_tx, pb_cmd_rx)   = bounded::<PlaybackCmd>(4);
        let (pb_frame_tx, pb_rx) = bounded::<PlaybackFrame>(32);

        thread::spawn(move || {
            let mut player: Option<OutputPlayer> = None;
            loop {
                // Block when idle; poll for commands between frames otherwise.
                let cmd = if player.is_some() {
                    match pb_cmd_rx.try_recv() {
                        Ok(cmd)                         => Some(cmd),
                        Err(TryRecvError::Empty)        => None,
                        Err(TryRecvError::Disconnected) => return,
                    }
                } else {
                    match pb_cmd_rx.recv() {
                        Ok(cmd) => Some(cmd),
                        Err(_)  => return,
                    }
                };

                if let Some(cmd) = cmd {
                    match cmd {
                        PlaybackCmd::Start { path, ts } => {
                            player = match OutputPlayer::open(&path, ts) {
                                Ok(p)  => Some(p),
                                Err(e) => {
                                    eprintln!("[playback] open: {e}");
                                    None
                                }
                            };
                        }
                        PlaybackCmd::Stop => {
                            player = None;
                        }
                    }
                    continue;
                }

                if let Some(p) = player.as_mut() {
                    match p.next_frame() {
                        Some((data, width, height, timestamp)) => {
                            let frame = PlaybackFrame { timestamp, width, height, data };
                            if pb_frame_tx.send(frame).is_err() {
                                return;
                            }
                        }
                        None => {
                            player = None; // EOF
                        }
                    }
                }
            }
        });

        Self { rx, tx, job_tx, pb_tx, pb_rx, engine, shutdown }
    }

    /// Queue a transcode. Runs are strictly sequential; the UI keeps its
    /// controls disabled until a JobDone / JobError event arrives.
    pub fn start_job(&self, job: TranscodeJob) {
        let _ = self.job_tx.send(JobCmd::Run(job));
    }

    /// Delete a superseded job's staging directory.
    pub fn discard_job(&self, job_id: Uuid) {
        let _ = self.job_tx.send(JobCmd::Discard(job_id));
    }

    /// Copy the produced file to a user-chosen destination.
    pub fn save_copy(&self, src: PathBuf, dest: PathBuf) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = std::fs::copy(&src, &dest)
                .with_context(|| format!("copy to {}", dest.display()));
            let event = match result {
                Ok(_)  => EngineEvent::CopySaved { path: dest },
                Err(e) => EngineEvent::CopyError { msg: format!("{e:#}") },
            };
            let _ = tx.send(event);
        });
    }

    /// (Re)start the preview pipeline at `ts` seconds into `path`.
    pub fn start_playback(&self, path: PathBuf, ts: f64) {
        // Flush stale frames from the previous position first — this also
        // unblocks the decode thread if it is parked on a full channel.
        while self.pb_rx.try_recv().is_ok() {}
        let _ = self.pb_tx.try_send(PlaybackCmd::Start { path, ts });
    }

    pub fn stop_playback(&self) {
        let _ = self.pb_tx.try_send(PlaybackCmd::Stop);
    }

    /// Tear down on app exit: stop accepting jobs and drop the engine,
    /// which removes the staging root.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.stop_playback();
        self.engine.lock().take();
    }
}

// ── Job execution ─────────────────────────────────────────────────────────────

fn run_job(
    slot:   &EngineSlot,
    config: &EngineConfig,
    job:    TranscodeJob,
    tx:     &Sender<EngineEvent>,
) {
    let job_id = job.job_id;
    match execute(slot, config, &job, tx) {
        Ok(done) => {
            let _ = tx.send(done);
        }
        Err(e) => {
            eprintln!("[engine] job {job_id}: {e:#}");
            let _ = tx.send(EngineEvent::JobError { job_id, msg: format!("{e:#}") });
        }
    }
}

/// write → exec → read, with probes on either side. Every step propagates
/// its error to run_job, which turns it into a JobError event — the modal
/// can never hang open on a failure.
fn execute(
    slot:   &EngineSlot,
    config: &EngineConfig,
    job:    &TranscodeJob,
    tx:     &Sender<EngineEvent>,
) -> Result<EngineEvent> {
    let engine = ensure_engine(slot, config)?;

    let bytes = std::fs::read(&job.input_path)
        .with_context(|| format!("read {}", job.input_path.display()))?;
    let staged = engine.write_file(job.job_id, &job.input_name, &bytes)?;

    // The input duration is the progress denominator — the output covers the
    // same span of media time. Soft-fail: progress just stays at zero.
    let duration_hint = match probe_media(&staged) {
        Ok(info) => info.duration,
        Err(e)   => {
            eprintln!("[engine] probe before run failed: {e:#}");
            0.0
        }
    };

    let request = EncodeRequest::new(job.input_name.as_str(), job.target_bitrate_kbps);
    let job_id  = job.job_id;
    engine.exec(job_id, &request.args(), duration_hint, &mut |fraction| {
        let _ = tx.send(EngineEvent::JobProgress { job_id, fraction });
    })?;

    let data        = engine.read_file(job_id, OUTPUT_NAME)?;
    let output_path = engine.staged_path(job_id, OUTPUT_NAME);

    // Probe the output for the preview stats; the file is already known
    // good (non-empty), so a probe failure only blanks the stats.
    let info = probe_media(&output_path).ok();

    Ok(EngineEvent::JobDone {
        job_id,
        path:       output_path,
        bytes:      data.len() as u64,
        duration:   info.as_ref().map(|i| i.duration).unwrap_or(0.0),
        video_size: info.and_then(|i| i.video_size),
    })
}
