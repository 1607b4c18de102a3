// crates/slimvid-ui/src/modules/upload.rs
//
// The drop pane: a large drop target plus a file picker. Shows the chosen
// filename (truncated the way the label rules demand) once a file is
// selected. All controls freeze while a run is in progress.

use super::Pane;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM};
use egui::{Color32, RichText, Stroke, Ui};
use rfd::FileDialog;
use slimvid_core::commands::AppCommand;
use slimvid_core::helpers::label::display_name;
use slimvid_core::state::{SessionState, WorkflowPhase};

use crate::helpers::format::format_size;

const VIDEO_EXTENSIONS: &[&str] =
    &["mp4", "mov", "mkv", "avi", "webm", "m4v", "mpg", "mts"];

pub struct UploadModule;

impl UploadModule {
    fn pick_file(cmd: &mut Vec<AppCommand>) {
        if let Some(path) = FileDialog::new()
            .add_filter("Video", VIDEO_EXTENSIONS)
            .pick_file()
        {
            cmd.push(AppCommand::ChooseFile(path));
        }
    }
}

impl Pane for UploadModule {
    fn name(&self) -> &str { "Upload" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        let processing = state.phase == WorkflowPhase::Processing;
        let hovering_files = ui.input(|i| !i.raw.hovered_files.is_empty());

        ui.vertical_centered(|ui| {
            let zone_h = 220.0_f32;
            let top_pad = ((ui.available_height() - zone_h) * 0.4).max(12.0);
            ui.add_space(top_pad);

            let border = if hovering_files && !processing {
                Stroke::new(2.0, ACCENT)
            } else {
                Stroke::new(1.0, DARK_BORDER)
            };

            egui::Frame::new()
                .fill(DARK_BG_2)
                .stroke(border)
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::same(24))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width().min(420.0));
                    ui.set_min_height(zone_h - 48.0);

                    ui.vertical_centered(|ui| {
                        match &state.selected {
                            None => {
                                ui.add_space(18.0);
                                ui.label(RichText::new("🎞").size(36.0));
                                ui.add_space(8.0);
                                ui.label(
                                    RichText::new("Drop a video here")
                                        .size(14.0)
                                        .strong(),
                                );
                                ui.label(
                                    RichText::new("or pick one from disk")
                                        .size(11.0)
                                        .color(DARK_TEXT_DIM),
                                );
                                ui.add_space(12.0);
                                if ui
                                    .add_enabled(
                                        !processing,
                                        egui::Button::new(
                                            RichText::new("＋ Browse…").size(12.0),
                                        ),
                                    )
                                    .clicked()
                                {
                                    Self::pick_file(cmd);
                                }
                            }
                            Some(file) => {
                                ui.add_space(14.0);
                                ui.label(RichText::new("🎬").size(32.0));
                                ui.add_space(6.0);
                                // The label contract: >15 chars shows the
                                // first 13 plus an ellipsis.
                                ui.label(
                                    RichText::new(display_name(&file.name))
                                        .size(14.0)
                                        .strong(),
                                )
                                .on_hover_text(file.name.as_str());
                                ui.label(
                                    RichText::new(format_size(file.size_bytes))
                                        .size(11.0)
                                        .color(DARK_TEXT_DIM)
                                        .monospace(),
                                );
                                ui.add_space(12.0);
                                ui.add_enabled_ui(!processing, |ui| {
                                    let swap = egui::Button::new(
                                        RichText::new("Choose another file")
                                            .size(11.0)
                                            .color(DARK_TEXT_DIM),
                                    )
                                    .fill(DARK_BG_3)
                                    .stroke(Stroke::new(1.0, DARK_BORDER));
                                    if ui.add(swap).clicked() {
                                        Self::pick_file(cmd);
                                    }
                                });
                            }
                        }
                        ui.add_space(10.0);
                    });
                });

            if hovering_files && !processing {
                ui.add_space(8.0);
                ui.label(RichText::new("Release to select").size(11.0).color(ACCENT));
            } else {
                ui.add_space(8.0);
                ui.label(
                    RichText::new("The original file is never modified")
                        .size(10.0)
                        .color(Color32::from_gray(90)),
                );
            }
        });
    }
}
