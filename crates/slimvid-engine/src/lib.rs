// crates/slimvid-engine/src/lib.rs
//
// No egui dependency — communicates with slimvid-ui via channels only.
//
// To add a new engine capability:
//   1. Create a new module file here
//   2. Add `mod mymodule;` below
//   3. Call it from worker.rs (run_job or a new EngineWorker method)

pub mod engine;
pub mod playback;
pub mod probe;
pub mod worker;

// Re-export the main public API so slimvid-ui imports are simple.
pub use engine::{EngineConfig, FfmpegEngine};
pub use worker::{EngineWorker, TranscodeJob};
pub use slimvid_core::events::{EngineEvent, PlaybackFrame};
