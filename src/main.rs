mod app;
mod engine;
mod util;
mod vibe;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Concept file, either a list of entries or a keyed vibe document.
    #[arg(long)]
    concepts: Option<PathBuf>,

    #[arg(long, default_value = "vibe-export.json")]
    export: PathBuf,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 820.0)]
    height: f32,

    /// Start with the simulation stopped.
    #[arg(long)]
    paused: bool,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "vibe bubbles",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::BubbleApp::new(
                cc,
                app::AppOptions {
                    concepts_path: args.concepts.clone(),
                    export_path: args.export.clone(),
                    start_paused: args.paused,
                },
            )))
        }),
    )
}
