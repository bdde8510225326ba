//! tree_snapshot: grow a tree off-screen and report what it looks like.
//!
//! Useful for tuning `TreeConfig` without a display.

use clap::Parser;
use tracing::info;

use particle_tree::{Framebuffer, ParticleField, PhysicsConfig, TreeConfig};

#[derive(Parser, Debug)]
#[command(name = "tree_snapshot", about = "Spawn and simulate a particle tree off-screen")]
struct Cli {
    #[arg(long, default_value_t = 1280)]
    width: usize,

    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Animation ticks to run after spawning
    #[arg(long, default_value_t = 120)]
    ticks: usize,

    /// Also dissipate on every tick
    #[arg(long)]
    fade: bool,

    #[arg(long)]
    seed: Option<u64>,
}

/// Log directive used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "tree_snapshot=info,particle_tree=info";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .init();

    let tree = TreeConfig::default();
    info!("expected particles per spawn: {}", tree.particle_count());

    let mut field = ParticleField::new(cli.width, cli.height, tree, PhysicsConfig::default(), cli.seed);
    let mut fb    = Framebuffer::new(cli.width, cli.height, 0xFF000000);

    field.spawn();
    println!("  tick {:>5}   particles {:>4}", 0, field.len());

    for tick in 1..=cli.ticks {
        if cli.fade {
            field.dissipate();
        }
        field.advance();
        field.render(&mut fb);
        if tick % 30 == 0 || field.is_empty() {
            println!(
                "  tick {:>5}   particles {:>4}   lit px {:>7}",
                tick, field.len(), fb.lit_pixels()
            );
        }
        if field.is_empty() {
            break;
        }
    }

    Ok(())
}
