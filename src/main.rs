mod app;
mod stack;
mod util;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Stack Overflow user id or profile URL to load at startup.
    #[arg(long, default_value = "5806646")]
    user: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "tag-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::TagBubblesApp::new(cc, args.user.clone())))),
    )
}
