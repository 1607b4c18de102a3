// crates/slimvid-ui/src/modules/preview.rs
//
// The preview pane: a monitor for the transcoded output with a small
// transport (play / pause / seek), the output stats, and the save-copy
// affordance. Takes over the central panel once a run completes; the drop
// pane comes back via "Choose another file".

use super::Pane;
use crate::context::compression_summary;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM, GREEN_DIM};
use egui::{Color32, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use slimvid_core::commands::AppCommand;
use slimvid_core::state::SessionState;

use crate::helpers::format::{format_size, format_time};

const BAR_H: f32 = 44.0;

pub struct PreviewModule {
    /// The live decoded frame for the current playhead position, set by
    /// app.rs each frame before ui() is called.
    pub current_frame: Option<egui::TextureHandle>,
}

impl PreviewModule {
    pub fn new() -> Self {
        Self { current_frame: None }
    }
}

impl Pane for PreviewModule {
    fn name(&self) -> &str { "Preview" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        let Some(output) = &state.output else {
            return; // pane is only shown in Previewing, but be safe
        };

        ui.vertical(|ui| {
            // ── Header ───────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(egui::Margin { left: 8, right: 8, top: 5, bottom: 5 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("📺 Result").size(12.0).strong());
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if let Some(status) = &state.save_status {
                                    let resp = ui.label(
                                        RichText::new(status).size(10.0).color(GREEN_DIM),
                                    );
                                    if resp.clicked() {
                                        cmd.push(AppCommand::ClearSaveStatus);
                                    }
                                }
                            },
                        );
                    });
                });

            ui.add_space(4.0);

            // ── Monitor canvas ───────────────────────────────────────────
            // Full width allocated, the video rect drawn centered inside it
            // at the output's aspect ratio.
            let ratio = output
                .video_size
                .map(|(w, h)| w as f32 / h.max(1) as f32)
                .unwrap_or(16.0 / 9.0);
            let panel_w = ui.available_width();
            let panel_h = (ui.available_height() - BAR_H - 88.0).max(80.0);

            let (canvas_w, canvas_h) = {
                let h = panel_w / ratio;
                if h <= panel_h { (panel_w, h) } else { (panel_h * ratio, panel_h) }
            };

            let (outer_rect, _) =
                ui.allocate_exact_size(Vec2::new(panel_w, canvas_h), Sense::hover());
            let canvas =
                Rect::from_center_size(outer_rect.center(), Vec2::new(canvas_w, canvas_h));
            let painter = ui.painter();

            if state.is_playing {
                painter.rect_stroke(
                    canvas.expand(2.0),
                    4.0,
                    Stroke::new(1.5, ACCENT.gamma_multiply(0.55)),
                    egui::StrokeKind::Outside,
                );
            } else {
                painter.rect_stroke(
                    canvas.expand(1.0),
                    4.0,
                    Stroke::new(1.0, DARK_BORDER),
                    egui::StrokeKind::Outside,
                );
            }
            painter.rect_filled(canvas, 3.0, Color32::BLACK);

            if let Some(tex) = &self.current_frame {
                painter.image(
                    tex.id(),
                    canvas,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            } else {
                // First frame still decoding — spinner.
                let t  = ui.input(|i| i.time) as f32;
                let cx = canvas.center();
                let r  = 12.0_f32;
                painter.circle_stroke(cx, r, Stroke::new(1.5, Color32::from_gray(35)));
                let a = t * 3.5;
                painter.line_segment(
                    [cx, cx + egui::vec2(a.cos() * r, a.sin() * r)],
                    Stroke::new(2.0, ACCENT),
                );
                ui.ctx().request_repaint();
            }

            ui.add_space(6.0);

            // ── Transport ────────────────────────────────────────────────
            ui.horizontal(|ui| {
                let label = if state.is_playing { "⏸" } else { "▶" };
                if ui
                    .add(egui::Button::new(RichText::new(label).size(14.0))
                        .min_size(egui::vec2(30.0, 26.0)))
                    .clicked()
                {
                    cmd.push(if state.is_playing {
                        AppCommand::Pause
                    } else {
                        AppCommand::Play
                    });
                }

                ui.label(
                    RichText::new(format!(
                        "{} / {}",
                        format_time(state.playhead),
                        format_time(output.duration)
                    ))
                    .size(10.0)
                    .monospace()
                    .color(DARK_TEXT_DIM),
                );

                let mut t = state.playhead;
                let slider = ui.add_sized(
                    [ui.available_width(), 18.0],
                    egui::Slider::new(&mut t, 0.0..=output.duration.max(0.001))
                        .show_value(false),
                );
                // Restart decode only once the scrub settles — every pixel
                // of a drag would re-open the decoder otherwise.
                if slider.drag_stopped() || (slider.changed() && !slider.dragged()) {
                    cmd.push(AppCommand::SetPlayhead(t));
                }
            });

            ui.add_space(6.0);

            // ── Output stats ─────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_3)
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let input_bytes = state
                        .selected
                        .as_ref()
                        .map(|f| f.size_bytes)
                        .unwrap_or(0);
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(compression_summary(input_bytes, output.bytes))
                                .size(11.0)
                                .monospace(),
                        );
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                let res = output
                                    .video_size
                                    .map(|(w, h)| format!("{w}×{h}"))
                                    .unwrap_or_else(|| "—".into());
                                ui.label(
                                    RichText::new(format!(
                                        "{res} · {} kbps · {}",
                                        state.bitrate_kbps,
                                        format_size(output.bytes)
                                    ))
                                    .size(10.0)
                                    .color(DARK_TEXT_DIM)
                                    .monospace(),
                                );
                            },
                        );
                    });
                });

            ui.add_space(8.0);

            // ── Actions ──────────────────────────────────────────────────
            ui.horizontal(|ui| {
                let save = egui::Button::new(
                    RichText::new("💾  Save a copy…")
                        .size(12.0)
                        .strong()
                        .color(Color32::BLACK),
                )
                .fill(ACCENT)
                .stroke(Stroke::NONE)
                .min_size(egui::vec2(150.0, 28.0));
                if ui.add(save).clicked() {
                    cmd.push(AppCommand::SaveCopy);
                }

                let back = egui::Button::new(
                    RichText::new("↩  Choose another file")
                        .size(11.0)
                        .color(DARK_TEXT_DIM),
                )
                .fill(DARK_BG_2)
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .min_size(egui::vec2(150.0, 28.0));
                if ui.add(back).clicked() {
                    cmd.push(AppCommand::ResetSession);
                }
            });
        });
    }
}
