//! gesture_tree: interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gesture_tree::{run, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "gesture_tree", about = "Grow a particle tree with an open hand, fade it with a fist")]
struct Cli {
    /// TOML config file; missing keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width
    #[arg(long)]
    width: Option<usize>,

    /// Initial window height
    #[arg(long)]
    height: Option<usize>,

    /// Fixed RNG seed for reproducible trees
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum milliseconds between tree spawns
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Skip the banner and start straight away
    #[arg(long)]
    quick: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_tree=info".into()),
        )
        .init();

    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(w) = cli.width       { cfg.window.width  = w; }
    if let Some(h) = cli.height      { cfg.window.height = h; }
    if let Some(s) = cli.seed        { cfg.seed          = Some(s); }
    if let Some(c) = cli.cooldown_ms { cfg.cooldown_ms   = c; }
    cfg.validate()?;

    if !cli.quick {
        println!();
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║          Gesture Tree: open hand grows, fist fades           ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();

        #[cfg(feature = "leap")]
        println!("  Mode: LeapMotion hardware");
        #[cfg(not(feature = "leap"))]
        println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
        println!("  Window {}×{}, cooldown {} ms", cfg.window.width, cfg.window.height, cfg.cooldown_ms);
        println!();
        println!("  Opening visualizer window…");
        println!();
    }

    run(cfg)?;
    Ok(())
}
