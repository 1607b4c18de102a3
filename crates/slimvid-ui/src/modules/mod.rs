// crates/slimvid-ui/src/modules/mod.rs
//
// Pane registry. To add a new pane:
//   1. Create modules/mypane.rs implementing Pane
//   2. Add `pub mod mypane;` below
//   3. Show it from app.rs

pub mod preview;
pub mod run;
pub mod upload;

use egui::Ui;
use slimvid_core::commands::AppCommand;
use slimvid_core::state::SessionState;

/// Every pane implements this trait.
/// Panes read state and emit commands — they never mutate state directly.
pub trait Pane {
    fn name(&self) -> &str;
    fn ui(&mut self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>);
}
