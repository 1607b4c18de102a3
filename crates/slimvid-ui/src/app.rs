// src/app.rs (slimvid-ui)
use std::path::{Path, PathBuf};

use eframe::egui;
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use slimvid_core::commands::AppCommand;
use slimvid_core::request::{clamp_bitrate, DEFAULT_BITRATE_KBPS};
use slimvid_core::state::{SessionState, UserPrefs, WorkflowPhase};
use slimvid_engine::{EngineConfig, EngineWorker, TranscodeJob};

use crate::context::AppContext;
use crate::modules::{preview::PreviewModule, run::RunModule, upload::UploadModule, Pane};
use crate::slimvid_log;
use crate::theme::configure_style;

#[derive(Serialize, Deserialize)]
struct AppStorage {
    prefs: UserPrefs,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct SlimVidApp {
    state:   SessionState,
    context: AppContext,
    // Panes as concrete types — a typo is a compile error, not a blank panel.
    upload:  UploadModule,
    run:     RunModule,
    preview: PreviewModule,
    /// Commands emitted by panes each frame, processed after the UI pass.
    pending_cmds: Vec<AppCommand>,
}

impl SlimVidApp {
    pub fn new(
        cc:           &eframe::CreationContext<'_>,
        preselect:    Option<PathBuf>,
        bitrate_flag: Option<u32>,
    ) -> Self {
        configure_style(&cc.egui_ctx);
        // Pin to dark mode — prevents egui overwriting the theme on OS
        // light/dark changes.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        let stored = cc
            .storage
            .and_then(|s| eframe::get_value::<AppStorage>(s, eframe::APP_KEY))
            .map(|d| d.prefs);

        // CLI flag beats the stored preference beats the default.
        let bitrate = bitrate_flag
            .map(clamp_bitrate)
            .or(stored.map(|p| clamp_bitrate(p.bitrate_kbps)))
            .unwrap_or(DEFAULT_BITRATE_KBPS);

        let engine_worker = EngineWorker::new(EngineConfig::default());

        let mut pending_cmds = Vec::new();
        if let Some(path) = preselect {
            pending_cmds.push(AppCommand::ChooseFile(path));
        }

        Self {
            state:   SessionState::new(bitrate),
            context: AppContext::new(engine_worker),
            upload:  UploadModule,
            run:     RunModule,
            preview: PreviewModule::new(),
            pending_cmds,
        }
    }

    fn process_command(&mut self, cmd: AppCommand) {
        match cmd {
            // ── File selection ───────────────────────────────────────────
            AppCommand::ChooseFile(path) => {
                if self.state.phase == WorkflowPhase::Processing {
                    return;
                }
                let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned())
                else {
                    self.state.alert = Some("That path has no filename".into());
                    return;
                };
                let size = match std::fs::metadata(&path) {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        self.state.alert = Some(format!("Could not read {name}: {e}"));
                        return;
                    }
                };
                self.context.clear_preview();
                if let Some(old) = self.state.select_file(name, path, size) {
                    self.context.engine_worker.discard_job(old.job_id);
                }
            }

            AppCommand::ResetSession => {
                if self.state.phase == WorkflowPhase::Processing {
                    return;
                }
                self.context.clear_preview();
                if let Some(old) = self.state.reset() {
                    self.context.engine_worker.discard_job(old.job_id);
                }
            }

            // ── Encode ───────────────────────────────────────────────────
            AppCommand::SetBitrate(kbps) => {
                self.state.bitrate_kbps = clamp_bitrate(kbps);
            }

            AppCommand::StartRun | AppCommand::RetryRun => {
                if self.state.phase == WorkflowPhase::Processing {
                    return;
                }
                // The one hard user-input error: no file at run time. The
                // alert is the whole reaction — no dialog, no engine call.
                let Some(file) = self.state.selected.clone() else {
                    self.state.alert = Some("You need to provide a file".into());
                    return;
                };

                self.context.clear_preview();
                let job_id = Uuid::new_v4();
                if let Some(old) = self.state.begin_run(job_id) {
                    self.context.engine_worker.discard_job(old.job_id);
                }
                slimvid_log!(
                    "[app] run {job_id}: {} @ {} kbps",
                    file.name,
                    self.state.bitrate_kbps
                );
                self.context.engine_worker.start_job(TranscodeJob {
                    job_id,
                    input_path:          file.path,
                    input_name:          file.name,
                    target_bitrate_kbps: self.state.bitrate_kbps,
                });
            }

            AppCommand::DismissFailure => {
                self.state.dismiss_failure();
            }
            AppCommand::DismissAlert => {
                self.state.alert = None;
            }

            // ── Output ───────────────────────────────────────────────────
            AppCommand::SaveCopy => {
                let Some(output) = self.state.output.clone() else { return };
                let stem = self
                    .state
                    .selected
                    .as_ref()
                    .and_then(|f| Path::new(&f.name).file_stem())
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "video".into());
                let default_name = format!("new-{stem}.mp4");

                if let Some(dest) = FileDialog::new()
                    .set_file_name(&default_name)
                    .add_filter("MP4 video", &["mp4"])
                    .save_file()
                {
                    self.state.save_status = None;
                    self.context.engine_worker.save_copy(output.path, dest);
                }
            }
            AppCommand::ClearSaveStatus => {
                self.state.save_status = None;
            }

            // ── Preview transport ────────────────────────────────────────
            AppCommand::Play => {
                let Some(output) = self.state.output.clone() else { return };
                if output.duration > 0.0 && self.state.playhead >= output.duration - 0.1 {
                    self.state.playhead = 0.0;
                }
                self.state.is_playing = true;
                self.context.flush_pending_frame();
                self.context
                    .engine_worker
                    .start_playback(output.path, self.state.playhead);
            }
            AppCommand::Pause => {
                self.state.is_playing = false;
                self.context.engine_worker.stop_playback();
            }
            AppCommand::SetPlayhead(t) => {
                let Some(output) = self.state.output.clone() else { return };
                self.state.playhead = t.clamp(0.0, output.duration.max(0.0));
                self.context.flush_pending_frame();
                // Re-open at the new position whether playing or paused —
                // a paused monitor still wants the frame under the playhead.
                self.context
                    .engine_worker
                    .start_playback(output.path, self.state.playhead);
            }
        }
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = files.into_iter().find_map(|f| f.path) {
            self.pending_cmds.push(AppCommand::ChooseFile(path));
        }
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for SlimVidApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let prefs = UserPrefs { bitrate_kbps: self.state.bitrate_kbps };
        eframe::set_value(storage, eframe::APP_KEY, &AppStorage { prefs });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Drops the engine singleton, which removes the staging root.
        self.context.engine_worker.shutdown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The modal has no dismiss path while the engine runs — eat Escape
        // so the window-level close shortcut can't sneak past it.
        if self.state.phase == WorkflowPhase::Processing {
            ctx.input_mut(|i| {
                i.events.retain(|e| {
                    !matches!(
                        e,
                        egui::Event::Key { key: egui::Key::Escape, pressed: true, .. }
                    )
                })
            });
        }

        self.handle_drag_and_drop(ctx);

        // ── Dispatch queued worker results into state / textures ──────────
        self.context.poll_playback(&self.state, ctx);
        self.context.ingest_engine_events(&mut self.state, ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(34.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("◆ SlimVid")
                            .strong()
                            .size(15.0)
                            .color(crate::theme::ACCENT),
                    );
                    ui.separator();
                    ui.label(
                        egui::RichText::new("Re-encode a video to a target bitrate")
                            .size(12.0)
                            .weak(),
                    );
                });
            });

        egui::SidePanel::right("encode_panel")
            .resizable(true)
            .default_width(230.0)
            .min_width(190.0)
            .show(ctx, |ui| {
                self.run.ui(ui, &self.state, &mut self.pending_cmds);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            // Exactly one of the two panes owns the central panel; the swap
            // is the upload-hidden / preview-shown flip of the workflow.
            if self.state.phase == WorkflowPhase::Previewing {
                self.preview.current_frame = self.context.frame_tex.clone();
                self.preview.ui(ui, &self.state, &mut self.pending_cmds);
            } else {
                self.upload.ui(ui, &self.state, &mut self.pending_cmds);
            }
        });

        // Paints on top of all panels.
        self.run.show_modal(ctx, &self.state, &mut self.pending_cmds);

        // ── Process commands emitted by panes this frame ──────────────────
        let cmds: Vec<AppCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(cmd);
        }

        // ── Advance the preview transport ─────────────────────────────────
        if self.state.is_playing {
            let dt = ctx.input(|i| i.stable_dt as f64);
            self.state.playhead += dt;
            let total = self
                .state
                .output
                .as_ref()
                .map(|o| o.duration)
                .unwrap_or(0.0);
            if total > 0.0 && self.state.playhead >= total {
                self.state.playhead   = total;
                self.state.is_playing = false;
                self.context.engine_worker.stop_playback();
            }
            ctx.request_repaint();
        }
    }
}
