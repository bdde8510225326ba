//! gesture_probe: replay recorded landmark frames through the classifier.
//!
//! ```text
//! gesture_probe session.jsonl
//! some_detector | gesture_probe --transitions-only
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use hand_gesture::replay::FrameReader;
use hand_gesture::{ClassifierConfig, GestureTracker};

#[derive(Parser, Debug)]
#[command(name = "gesture_probe", about = "Classify recorded hand-landmark frames")]
struct Cli {
    /// JSON-lines recording (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Finger extension ratio threshold
    #[arg(long, default_value_t = 0.8)]
    ratio: f32,

    /// Minimum extended digits for "open"
    #[arg(long, default_value_t = 4)]
    open_min: usize,

    /// Maximum extended digits for "closed"
    #[arg(long, default_value_t = 1)]
    closed_max: usize,

    /// Print only frames that emit a transition
    #[arg(long)]
    transitions_only: bool,
}

/// Log directive used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "gesture_probe=info,hand_gesture=info";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with_writer(io::stderr)
        .init();

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Box::new(BufReader::new(f))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut tracker = GestureTracker::new(ClassifierConfig {
        extension_ratio:     cli.ratio,
        open_min_extended:   cli.open_min,
        closed_max_extended: cli.closed_max,
    });

    let mut frames      = 0usize;
    let mut transitions = 0usize;

    for frame in FrameReader::new(reader) {
        let frame = frame?;
        let obs = tracker.observe(frame.as_deref());
        frames += 1;

        if let Some(label) = obs.emitted {
            transitions += 1;
            println!("  [{:>6}]  {:<8} → {}", frames, label.as_str(), label.as_str().to_uppercase());
        } else if !cli.transitions_only {
            let shown = obs.label.map(|l| l.as_str()).unwrap_or("-");
            println!("  [{:>6}]  {}", frames, shown);
        }
    }

    info!("{} frames, {} transitions", frames, transitions);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_this_binary() {
        let root = module_path!().split("::").next().unwrap_or_default();
        assert!(DEFAULT_FILTER.split(',').any(|d| d == format!("{}=info", root)));
    }
}
