//! # drag-replay
//!
//! Replays a scripted pointer gesture through a drag registry and prints
//! what the move callback observed as JSON.
//!
//! ```bash
//! drag-replay gesture.json
//! RUST_LOG=drag_history=trace drag-replay gesture.json --compact
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use drag_history::replay::{replay, ReplayScript};
use std::path::PathBuf;

/// Replay a scripted drag gesture
#[derive(Parser, Debug)]
#[command(name = "drag-replay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON gesture script
    script: PathBuf,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Log every recorded row
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    drag_history::init_tracing(cli.verbose);

    let script = ReplayScript::from_path(&cli.script)?;
    let report = replay(&script)?;

    let output = if cli.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .context("Failed to serialize replay report")?;

    println!("{}", output);
    Ok(())
}
