//! Command-line argument definitions

use clap::Args;
use clap_num::number_range;

use crate::domain::model::CATEGORY_COUNT;

/// Range-checked parser for marker category indices
fn marker_category(s: &str) -> Result<usize, String> {
    number_range(s, 0, CATEGORY_COUNT - 1)
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Marker file path (JSON array of {pos, comment, type})
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the add command
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Marker file path, created when missing
    #[arg(short, long)]
    pub file: String,

    /// Position (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub pos: String,

    /// Marker comment
    #[arg(short, long)]
    pub comment: Option<String>,

    /// Marker category index
    #[arg(short = 't', long = "type", value_parser = marker_category)]
    pub category: Option<usize>,
}

/// Arguments for the remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Marker file path
    #[arg(short, long)]
    pub file: String,

    /// Position of the marker to remove
    #[arg(short, long)]
    pub pos: String,
}

/// Arguments for the snap command
#[derive(Args, Debug)]
pub struct SnapArgs {
    /// Marker file path
    #[arg(short, long)]
    pub file: String,

    /// Frame index to snap
    #[arg(long)]
    pub frame: i64,

    /// Snap tolerance in frames
    #[arg(long, default_value = "10")]
    pub tolerance: i64,
}
