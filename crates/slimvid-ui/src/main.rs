#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod context;
mod helpers;
mod modules;
mod theme;

use std::path::PathBuf;

use clap::Parser;

/// Re-encode a local video to a target bitrate and preview the result.
#[derive(Parser, Debug)]
#[command(name = "slimvid", version, about)]
struct Args {
    /// Video file to preselect in the drop pane.
    input: Option<PathBuf>,

    /// Target video bitrate in kbps; seeds the bitrate field.
    #[arg(long)]
    bitrate: Option<u32>,
}

fn main() -> eframe::Result {
    ffmpeg_the_third::init().expect("FFmpeg init failed");

    let args = Args::parse();

    let native_options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("SlimVid")
            .with_inner_size([920.0, 580.0])
            .with_min_inner_size([680.0, 440.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SlimVid",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(app::SlimVidApp::new(cc, args.input, args.bitrate)))
        }),
    )
}
