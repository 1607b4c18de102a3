// crates/slimvid-ui/src/modules/run.rs
//
// RunModule: right-panel UI for configuring and launching a transcode, plus
// the full-screen modal overlay for run status.
//
// State machine (driven by SessionState, set by app.rs):
//
//   FileSelected → user clicks "Transcode"
//                → app.rs generates a job id, calls engine_worker.start_job
//                → phase = Processing
//
//   Processing   → JobProgress events arrive as fractions in [0,1]
//                → progress_pct = floor(fraction*100), monotonic
//                → modal shows the bar; no cancel exists, Escape is eaten
//
//   Previewing   → modal closes itself (phase changed), preview pane takes
//                  over; the panel offers "Run again" for a new bitrate
//
//   Failed       → modal shows the error with "Try again" / "Dismiss"
//
// A run requested with no file never opens the modal and never touches the
// engine — it raises the blocking alert card instead.

use super::Pane;
use crate::theme::{
    ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM, RED_DIM,
};
use egui::{Color32, Context, Margin, RichText, Stroke, Ui};
use slimvid_core::commands::AppCommand;
use slimvid_core::request::{MAX_BITRATE_KBPS, MIN_BITRATE_KBPS, OUTPUT_NAME};
use slimvid_core::state::{SessionState, WorkflowPhase};

use crate::helpers::format::format_size;

/// Background fill for the progress bar track.
const TRACK_BG: Color32 = Color32::from_rgb(33, 36, 40);
/// Filled portion of the progress bar.
const TRACK_FG: Color32 = Color32::from_rgb(90, 200, 175);

pub struct RunModule;

impl Pane for RunModule {
    fn name(&self) -> &str { "Encode" }

    fn ui(&mut self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        let processing = state.phase == WorkflowPhase::Processing;

        ui.vertical(|ui| {
            // ── Header ────────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_2)
                .inner_margin(Margin { left: 8, right: 8, top: 6, bottom: 6 })
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("⚙ Encode").size(12.0).strong());
                    });
                });

            ui.separator();
            ui.add_space(4.0);

            // ── Target bitrate ────────────────────────────────────────────
            ui.label(RichText::new("Target bitrate").size(11.0).color(DARK_TEXT_DIM));
            ui.add_space(2.0);
            let mut kbps = state.bitrate_kbps;
            let resp = ui.add_enabled(
                !processing,
                egui::DragValue::new(&mut kbps)
                    .range(MIN_BITRATE_KBPS..=MAX_BITRATE_KBPS)
                    .speed(25)
                    .suffix(" kbps"),
            );
            if resp.changed() {
                cmd.push(AppCommand::SetBitrate(kbps));
            }
            ui.label(
                RichText::new("average video bitrate of the output")
                    .size(9.0)
                    .color(DARK_TEXT_DIM),
            );

            ui.add_space(10.0);

            // ── Summary ───────────────────────────────────────────────────
            egui::Frame::new()
                .fill(DARK_BG_3)
                .stroke(Stroke::new(1.0, DARK_BORDER))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    match &state.selected {
                        Some(file) => {
                            ui.label(
                                RichText::new(format!("Input:   {}", file.name))
                                    .size(11.0)
                                    .monospace(),
                            );
                            ui.label(
                                RichText::new(format!(
                                    "Size:    {}",
                                    format_size(file.size_bytes)
                                ))
                                .size(11.0)
                                .monospace(),
                            );
                        }
                        None => {
                            ui.label(
                                RichText::new("Input:   —")
                                    .size(11.0)
                                    .monospace()
                                    .color(DARK_TEXT_DIM),
                            );
                        }
                    }
                    ui.label(
                        RichText::new(format!("Video:   {} kbps", state.bitrate_kbps))
                            .size(11.0)
                            .monospace(),
                    );
                    ui.label(
                        RichText::new(format!("Output:  {OUTPUT_NAME}"))
                            .size(11.0)
                            .monospace(),
                    );
                });

            ui.add_space(12.0);

            // ── Run button (replaced by the modal while encoding) ─────────
            if !processing {
                let label = if state.phase == WorkflowPhase::Previewing {
                    "⚡ Run again"
                } else {
                    "⚡ Transcode"
                };
                let armed = state.selected.is_some();
                let run_btn = egui::Button::new(
                    RichText::new(label)
                        .size(13.0)
                        .strong()
                        .color(if armed { Color32::BLACK } else { Color32::DARK_GRAY }),
                )
                .fill(if armed { ACCENT } else { DARK_BG_3 })
                .stroke(Stroke::NONE)
                .min_size(egui::vec2(ui.available_width(), 34.0));

                // Deliberately clickable with no file — the click surfaces
                // the blocking alert instead of silently doing nothing.
                if ui.add(run_btn).clicked() {
                    cmd.push(AppCommand::StartRun);
                }
            }
        });
    }
}

// ── Modal overlay ─────────────────────────────────────────────────────────────

impl RunModule {
    /// Full-screen modal for run status (processing / failed) and for the
    /// blocking alert. Call from app.rs::update() *after* all panels so it
    /// paints on top. No-op when nothing demands it.
    ///
    /// Layer order (bottom → top): panels → scrim → card.
    pub fn show_modal(&self, ctx: &Context, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        let processing = state.phase == WorkflowPhase::Processing;
        let failed     = state.phase == WorkflowPhase::Failed;
        let alerting   = state.alert.is_some();
        if !processing && !failed && !alerting {
            return;
        }

        let screen = ctx.screen_rect();

        // Scrim: half-opacity black over the whole window, painted on the
        // Foreground layer before the card Area so the card wins.
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("run_modal_scrim"),
        ));
        painter.rect_filled(screen, 0.0, Color32::from_black_alpha(128));

        const CARD_W: f32 = 420.0;
        const CARD_H: f32 = 240.0;
        const PAD:    f32 = 26.0;

        let card_rect =
            egui::Rect::from_center_size(screen.center(), egui::vec2(CARD_W, CARD_H));
        let inner_rect = card_rect.shrink(PAD);

        let border_col = if failed { RED_DIM } else { TRACK_FG };

        egui::Area::new(egui::Id::new("run_modal_content"))
            .order(egui::Order::Foreground)
            .fixed_pos(card_rect.min)
            .show(ctx, |ui| {
                ui.set_min_size(card_rect.size());
                ui.set_max_size(card_rect.size());

                // Card background first, same layer as the widgets so it is
                // always behind them.
                ui.painter().rect(
                    card_rect,
                    0.0,
                    Color32::from_rgba_unmultiplied(10, 12, 14, 235),
                    Stroke::new(1.0, border_col),
                    egui::StrokeKind::Inside,
                );

                let mut child =
                    ui.new_child(egui::UiBuilder::new().max_rect(inner_rect));

                if alerting {
                    self.card_alert(&mut child, state, cmd);
                } else if failed {
                    self.card_failed(&mut child, state, cmd);
                } else {
                    self.card_processing(&mut child, state);
                    ctx.request_repaint();
                }
            });
    }

    fn card_processing(&self, ui: &mut Ui, state: &SessionState) {
        let pct = state.progress_pct.min(100);

        ui.label(
            RichText::new("Transcoding…")
                .size(13.0)
                .strong()
                .color(Color32::WHITE),
        );
        ui.add_space(12.0);

        ui.label(
            RichText::new(format!("{pct}%"))
                .size(42.0)
                .strong()
                .color(TRACK_FG),
        );
        ui.add_space(10.0);

        // Progress bar — width follows floor(progress × 100).
        let (bar_rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 8.0),
            egui::Sense::hover(),
        );
        let p = ui.painter();
        p.rect_filled(bar_rect, 4.0, TRACK_BG);
        if pct > 0 {
            let mut fill = bar_rect;
            fill.max.x = bar_rect.min.x + bar_rect.width() * (pct as f32 / 100.0);
            p.rect_filled(fill, 4.0, TRACK_FG);
        }
        ui.add_space(8.0);

        if let Some(file) = &state.selected {
            ui.label(
                RichText::new(&file.name)
                    .size(10.0)
                    .color(DARK_TEXT_DIM),
            );
        }
        ui.add_space(10.0);
        ui.label(
            RichText::new("Large files can take a while. The dialog closes by itself.")
                .size(10.0)
                .color(DARK_TEXT_DIM),
        );
    }

    fn card_failed(&self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        let msg = state.failure.as_deref().unwrap_or("");

        ui.label(
            RichText::new("Transcode failed")
                .size(13.0)
                .strong()
                .color(Color32::WHITE),
        );
        ui.add_space(12.0);

        egui::Frame::new()
            .fill(Color32::from_rgb(58, 24, 24))
            .stroke(Stroke::new(1.0, RED_DIM))
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(Margin::same(8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(msg).size(11.0).color(RED_DIM));
            });

        ui.add_space(14.0);

        let retry = egui::Button::new(
            RichText::new("↻  Try again").size(11.0).color(Color32::BLACK),
        )
        .fill(ACCENT)
        .stroke(Stroke::NONE)
        .min_size(egui::vec2(ui.available_width(), 28.0));
        if ui.add(retry).clicked() {
            cmd.push(AppCommand::RetryRun);
        }

        ui.add_space(6.0);

        let dismiss = egui::Button::new(
            RichText::new("Dismiss").size(11.0).color(DARK_TEXT_DIM),
        )
        .stroke(Stroke::new(1.0, DARK_BORDER))
        .fill(DARK_BG_2)
        .min_size(egui::vec2(ui.available_width(), 28.0));
        if ui.add(dismiss).clicked() {
            cmd.push(AppCommand::DismissFailure);
        }
    }

    fn card_alert(&self, ui: &mut Ui, state: &SessionState, cmd: &mut Vec<AppCommand>) {
        let msg = state.alert.as_deref().unwrap_or("");

        ui.label(
            RichText::new("Hold on")
                .size(13.0)
                .strong()
                .color(Color32::WHITE),
        );
        ui.add_space(14.0);

        egui::Frame::new()
            .fill(DARK_BG_3)
            .stroke(Stroke::new(1.0, DARK_BORDER))
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(Margin::same(8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(msg).size(11.0));
            });

        ui.add_space(14.0);

        let ok = egui::Button::new(RichText::new("OK").size(11.0).color(Color32::BLACK))
            .fill(ACCENT)
            .stroke(Stroke::NONE)
            .min_size(egui::vec2(ui.available_width(), 28.0));
        if ui.add(ok).clicked() {
            cmd.push(AppCommand::DismissAlert);
        }
    }
}
