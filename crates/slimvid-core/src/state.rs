// crates/slimvid-core/src/state.rs
//
// SessionState: the upload → transcode → preview workflow as explicit data.
// Exactly one WorkflowPhase is active at any time; transitions happen only
// in the methods below, driven by user commands and engine events.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::helpers::label::progress_percent;

/// The mutually exclusive visual states of the workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// Nothing chosen yet — the drop pane invites a file.
    AwaitingFile,
    /// A file is selected; the run trigger is armed.
    FileSelected,
    /// The engine is running; the modal overlay is up. No way out except an
    /// engine event — there is deliberately no cancel affordance.
    Processing,
    /// A finished output exists and the preview monitor owns the screen.
    Previewing,
    /// The engine reported an error; the modal shows it with a retry.
    Failed,
}

/// The user-chosen input file. Replaced on a new selection, cleared on reset.
#[derive(Clone, Debug)]
pub struct SelectedFile {
    pub name:       String,
    pub path:       PathBuf,
    pub size_bytes: u64,
}

/// A finished transcode: the produced file inside the job's staging
/// directory plus probed metadata for the preview pane. The staging
/// directory lives until this run is superseded or the session resets.
#[derive(Clone, Debug)]
pub struct OutputInfo {
    pub job_id:     Uuid,
    pub path:       PathBuf,
    pub bytes:      u64,
    pub duration:   f64,
    pub video_size: Option<(u32, u32)>,
}

/// Settings persisted across sessions via eframe storage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct UserPrefs {
    pub bitrate_kbps: u32,
}

#[derive(Debug)]
pub struct SessionState {
    pub phase:        WorkflowPhase,
    pub selected:     Option<SelectedFile>,
    pub bitrate_kbps: u32,

    /// UUID of the running transcode, or None when idle. Every engine event
    /// is checked against this so a stale result from a superseded job can
    /// never clobber a fresh one.
    pub active_job:   Option<Uuid>,
    /// floor(fraction × 100). Never decreases within one run.
    pub progress_pct: u32,

    pub output:       Option<OutputInfo>,
    pub failure:      Option<String>,
    /// Blocking alert text (e.g. run requested with no file). Rendered as a
    /// modal card; cleared by the OK button.
    pub alert:        Option<String>,
    /// Brief toast after "Save a copy…" completes.
    pub save_status:  Option<String>,

    // ── Preview transport ────────────────────────────────────────────────
    pub is_playing:   bool,
    pub playhead:     f64,
}

impl SessionState {
    pub fn new(bitrate_kbps: u32) -> Self {
        Self {
            phase:        WorkflowPhase::AwaitingFile,
            selected:     None,
            bitrate_kbps,
            active_job:   None,
            progress_pct: 0,
            output:       None,
            failure:      None,
            alert:        None,
            save_status:  None,
            is_playing:   false,
            playhead:     0.0,
        }
    }

    /// Select an input file. Valid from every phase except Processing.
    /// Returns the superseded output (if any) so the caller can discard the
    /// old job's staging directory.
    pub fn select_file(
        &mut self,
        name: String,
        path: PathBuf,
        size_bytes: u64,
    ) -> Option<OutputInfo> {
        if self.phase == WorkflowPhase::Processing {
            return None;
        }
        let old = self.clear_run_artifacts();
        self.selected = Some(SelectedFile { name, path, size_bytes });
        self.phase    = WorkflowPhase::FileSelected;
        old
    }

    /// Arm a new run. The caller must have verified a file is selected and
    /// generated the job id; the old output (if any) is returned for
    /// discarding.
    pub fn begin_run(&mut self, job_id: Uuid) -> Option<OutputInfo> {
        debug_assert!(self.selected.is_some(), "begin_run without a file");
        let old = self.clear_run_artifacts();
        self.active_job   = Some(job_id);
        self.progress_pct = 0;
        self.phase        = WorkflowPhase::Processing;
        old
    }

    /// Apply a progress fraction in [0, 1] from the engine. Stale jobs are
    /// ignored; the displayed percentage only ever moves forward.
    pub fn apply_progress(&mut self, job_id: Uuid, fraction: f64) {
        if self.active_job != Some(job_id) {
            return;
        }
        self.progress_pct = self.progress_pct.max(progress_percent(fraction));
    }

    /// The engine finished: swap the panes and arm the preview transport.
    pub fn complete(&mut self, output: OutputInfo) {
        if self.active_job != Some(output.job_id) {
            return;
        }
        self.progress_pct = 100;
        self.output       = Some(output);
        self.phase        = WorkflowPhase::Previewing;
        self.is_playing   = false;
        self.playhead     = 0.0;
    }

    /// The engine failed: keep the file, show the error with a retry.
    pub fn fail(&mut self, job_id: Uuid, msg: String) {
        if self.active_job != Some(job_id) {
            return;
        }
        self.failure = Some(msg);
        self.phase   = WorkflowPhase::Failed;
    }

    /// Dismiss the failure card without retrying.
    pub fn dismiss_failure(&mut self) {
        if self.phase == WorkflowPhase::Failed {
            self.failure = None;
            self.phase   = if self.selected.is_some() {
                WorkflowPhase::FileSelected
            } else {
                WorkflowPhase::AwaitingFile
            };
        }
    }

    /// Full reset back to the drop pane. Returns the output whose staging
    /// directory should be discarded. Valid from every phase except
    /// Processing.
    pub fn reset(&mut self) -> Option<OutputInfo> {
        if self.phase == WorkflowPhase::Processing {
            return None;
        }
        let old = self.clear_run_artifacts();
        self.selected = None;
        self.phase    = WorkflowPhase::AwaitingFile;
        old
    }

    /// Clear everything a previous run produced; phase is left for the
    /// caller to set.
    fn clear_run_artifacts(&mut self) -> Option<OutputInfo> {
        self.active_job   = None;
        self.progress_pct = 0;
        self.failure      = None;
        self.save_status  = None;
        self.is_playing   = false;
        self.playhead     = 0.0;
        self.output.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_state() -> SessionState {
        let mut s = SessionState::new(1800);
        s.select_file("clip.mov".into(), PathBuf::from("/tmp/clip.mov"), 2 << 20);
        s
    }

    fn done_output(job: Uuid) -> OutputInfo {
        OutputInfo {
            job_id:     job,
            path:       PathBuf::from("/tmp/output.mp4"),
            bytes:      1024,
            duration:   3.0,
            video_size: Some((1280, 720)),
        }
    }

    #[test]
    fn selecting_a_file_arms_the_run() {
        let s = selected_state();
        assert_eq!(s.phase, WorkflowPhase::FileSelected);
        assert_eq!(s.selected.as_ref().unwrap().name, "clip.mov");
    }

    #[test]
    fn selection_is_rejected_while_processing() {
        let mut s = selected_state();
        s.begin_run(Uuid::new_v4());
        s.select_file("other.mp4".into(), PathBuf::from("/tmp/other.mp4"), 1);
        assert_eq!(s.phase, WorkflowPhase::Processing);
        assert_eq!(s.selected.as_ref().unwrap().name, "clip.mov");
    }

    #[test]
    fn run_then_complete_reaches_previewing() {
        let mut s = selected_state();
        let job = Uuid::new_v4();
        s.begin_run(job);
        assert_eq!(s.phase, WorkflowPhase::Processing);
        s.apply_progress(job, 0.5);
        assert_eq!(s.progress_pct, 50);
        s.complete(done_output(job));
        assert_eq!(s.phase, WorkflowPhase::Previewing);
        assert_eq!(s.progress_pct, 100);
    }

    #[test]
    fn progress_never_moves_backwards() {
        let mut s = selected_state();
        let job = Uuid::new_v4();
        s.begin_run(job);
        s.apply_progress(job, 0.8);
        s.apply_progress(job, 0.3);
        assert_eq!(s.progress_pct, 80);
    }

    #[test]
    fn stale_job_events_are_ignored() {
        let mut s = selected_state();
        let job = Uuid::new_v4();
        s.begin_run(job);
        let stale = Uuid::new_v4();
        s.apply_progress(stale, 0.9);
        s.fail(stale, "boom".into());
        assert_eq!(s.progress_pct, 0);
        assert_eq!(s.phase, WorkflowPhase::Processing);
        s.complete(done_output(stale));
        assert_eq!(s.phase, WorkflowPhase::Processing);
    }

    #[test]
    fn failure_keeps_the_file_for_retry() {
        let mut s = selected_state();
        let job = Uuid::new_v4();
        s.begin_run(job);
        s.fail(job, "no space left on device".into());
        assert_eq!(s.phase, WorkflowPhase::Failed);
        s.dismiss_failure();
        assert_eq!(s.phase, WorkflowPhase::FileSelected);
        assert!(s.selected.is_some());
        assert!(s.failure.is_none());
    }

    #[test]
    fn reset_returns_to_the_drop_pane_from_previewing() {
        let mut s = selected_state();
        let job = Uuid::new_v4();
        s.begin_run(job);
        s.complete(done_output(job));
        let discarded = s.reset();
        assert_eq!(s.phase, WorkflowPhase::AwaitingFile);
        assert!(s.selected.is_none());
        assert_eq!(discarded.unwrap().job_id, job);
    }

    #[test]
    fn reset_is_rejected_while_processing() {
        let mut s = selected_state();
        s.begin_run(Uuid::new_v4());
        assert!(s.reset().is_none());
        assert_eq!(s.phase, WorkflowPhase::Processing);
    }

    #[test]
    fn new_selection_supersedes_the_old_output() {
        let mut s = selected_state();
        let job = Uuid::new_v4();
        s.begin_run(job);
        s.complete(done_output(job));
        let old = s.select_file("next.mp4".into(), PathBuf::from("/tmp/next.mp4"), 9);
        assert_eq!(old.unwrap().job_id, job);
        assert_eq!(s.phase, WorkflowPhase::FileSelected);
        assert!(s.output.is_none());
    }
}
