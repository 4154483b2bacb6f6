//! TimeMark CLI
//!
//! Scriptable timeline markers and guides: an ordered, undoable marker
//! store with snap-point queries, operating on marker files in the JSON
//! interchange format.
//!
//! # Usage
//!
//! ```bash
//! timemark add --file markers.json --pos 00:02:00 --comment "intro"
//! timemark list --file markers.json --fps 25
//! timemark snap --file markers.json --frame 2998 --fps 30000/1001
//! timemark remove --file markers.json --pos 120
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use timemark::cli::commands::{self, CliContext};
use timemark::cli::{Cli, Commands};
use timemark::config::Settings;
use timemark::utils::logging;

/// Main entry point for the TimeMark CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    logging::init(&cli.log_level);
    info!("Starting TimeMark");

    // Load settings
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let ctx = CliContext {
        settings,
        fps: cli.fps.clone(),
        clip: cli.clip.clone(),
    };

    // Execute the requested command
    match cli.command {
        Commands::List(args) => commands::list(args, &ctx)?,
        Commands::Add(args) => commands::add(args, &ctx)?,
        Commands::Remove(args) => commands::remove(args, &ctx)?,
        Commands::Snap(args) => commands::snap(args, &ctx)?,
    }

    info!("TimeMark completed successfully");
    Ok(())
}
