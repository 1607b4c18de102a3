// crates/slimvid-core/src/commands.rs
//
// Every user action in SlimVid is expressed as an AppCommand.
// Panes emit these; app.rs processes them after the UI pass.
// Adding a new feature = add a variant here + one match arm in app.rs.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum AppCommand {
    // ── File selection ───────────────────────────────────────────────────
    /// Select an input file (picker, drop, or CLI positional). Ignored while
    /// a run is in progress.
    ChooseFile(PathBuf),
    /// Tear everything down and return to the drop pane.
    ResetSession,

    // ── Encode ───────────────────────────────────────────────────────────
    SetBitrate(u32),
    /// Run with the current file + bitrate. With no file selected this
    /// raises the blocking alert instead of touching the engine.
    StartRun,
    /// Re-run after a failure, same file and bitrate.
    RetryRun,
    DismissFailure,
    DismissAlert,

    // ── Output ───────────────────────────────────────────────────────────
    /// Open the save dialog and copy the produced file out of the staging
    /// directory.
    SaveCopy,
    ClearSaveStatus,

    // ── Preview transport ────────────────────────────────────────────────
    Play,
    Pause,
    SetPlayhead(f64),
}
