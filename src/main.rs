mod app;
mod config;
mod map;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Learning map JSON document (`{"nodes": [...], "links": [...]}`)
    map: Option<PathBuf>,

    /// TOML config file; defaults to the per-user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Title used in the header and for exported file names
    #[arg(long)]
    title: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "learning-map",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::LearningMapApp::new(
                cc,
                args.map.clone(),
                args.title.clone(),
                config,
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("failed to start viewer: {error}"))
}
