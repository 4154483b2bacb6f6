//! CLI module for TimeMark
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// TimeMark
///
/// Timeline markers and guides with undo/redo semantics and snap-point
/// queries, operating on marker files in the JSON interchange format.
#[derive(Parser)]
#[command(name = "timemark")]
#[command(about = "TimeMark - Timeline markers and guides made scriptable")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Project frame rate (fps or num/den), overrides settings
    #[arg(long, global = true)]
    pub fps: Option<String>,

    /// Operate on clip markers owned by this clip id instead of project guides
    #[arg(long, global = true)]
    pub clip: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the markers in a file
    List(args::ListArgs),
    /// Add or rename a marker
    Add(args::AddArgs),
    /// Remove a marker
    Remove(args::RemoveArgs),
    /// Find the nearest snap point to a frame
    Snap(args::SnapArgs),
}
