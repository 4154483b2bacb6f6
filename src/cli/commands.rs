//! Command implementations

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{AddArgs, ListArgs, RemoveArgs, SnapArgs};
use crate::config::Settings;
use crate::domain::model::{FieldValue, FrameRate, MarkerField, TimeSpec, DEFAULT_COMMENT};
use crate::history::CommandHistory;
use crate::markers::MarkerModel;
use crate::project::ProjectProfile;
use crate::snap::{SnapIndex, SnapTarget};

/// Shared state of one CLI invocation
pub struct CliContext {
    pub settings: Settings,
    pub fps: Option<String>,
    pub clip: Option<String>,
}

/// A marker model wired to its collaborators, loaded from a file
struct Session {
    history: Arc<Mutex<CommandHistory>>,
    profile: Arc<ProjectProfile>,
    model: Arc<MarkerModel>,
}

impl Session {
    fn open(ctx: &CliContext, file: &str, must_exist: bool) -> Result<Self> {
        let rate = match &ctx.fps {
            Some(fps) => FrameRate::parse(fps)
                .map_err(|e| anyhow::anyhow!("Invalid frame rate '{}': {}", fps, e))?,
            None => ctx
                .settings
                .frame_rate()
                .map_err(|e| anyhow::anyhow!("Invalid settings frame rate: {}", e))?,
        };
        let profile = Arc::new(ProjectProfile::new(rate));
        let history = Arc::new(Mutex::new(CommandHistory::new(ctx.settings.history_limit)));

        let model = match &ctx.clip {
            Some(clip_id) => MarkerModel::new_clip(
                clip_id.clone(),
                Arc::downgrade(&history),
                Arc::clone(&profile),
                ctx.settings.default_marker_type,
            ),
            None => MarkerModel::new_guide(
                Arc::downgrade(&history),
                Arc::clone(&profile),
                ctx.settings.default_marker_type,
            ),
        };

        if Path::new(file).exists() {
            let data = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read marker file: {}", file))?;
            if !model.import_from_json(&data) {
                return Err(anyhow::anyhow!("Failed to import markers from {}", file));
            }
        } else if must_exist {
            return Err(anyhow::anyhow!("Marker file does not exist: {}", file));
        }

        Ok(Self {
            history,
            profile,
            model,
        })
    }

    fn save(&self, file: &str) -> Result<()> {
        std::fs::write(file, self.model.export_to_json())
            .with_context(|| format!("Failed to write marker file: {}", file))
    }
}

/// Execute the list command
pub fn list(args: ListArgs, ctx: &CliContext) -> Result<()> {
    let session = Session::open(ctx, &args.file, true)?;

    if args.json {
        // Re-indent the interchange format for reading
        let value: serde_json::Value = serde_json::from_str(&session.model.export_to_json())?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let rate = session.profile.frame_rate();
    println!(
        "{} in {} ({} fps)",
        if session.model.is_guide() {
            "Guides"
        } else {
            "Markers"
        },
        args.file,
        rate.as_fps()
    );
    println!("{:<5} {:>8}  {:>12}  {:<5} {:<8} Comment", "Row", "Frame", "Timecode", "Type", "Color");
    for row in 0..session.model.row_count() {
        let frame = match session.model.data_for_row(row, MarkerField::Frame) {
            Some(FieldValue::Frame(frame)) => frame,
            _ => continue,
        };
        let seconds = match session.model.data_for_row(row, MarkerField::Position) {
            Some(FieldValue::Seconds(seconds)) => seconds,
            _ => continue,
        };
        let category = match session.model.data_for_row(row, MarkerField::Category) {
            Some(FieldValue::Category(category)) => category,
            _ => continue,
        };
        let color = match session.model.data_for_row(row, MarkerField::Color) {
            Some(FieldValue::Color(color)) => color,
            _ => continue,
        };
        let comment = match session.model.data_for_row(row, MarkerField::Comment) {
            Some(FieldValue::Text(comment)) => comment,
            _ => continue,
        };
        println!(
            "{:<5} {:>8}  {:>12}  {:<5} {:<8} {}",
            row,
            frame,
            TimeSpec::from_seconds(seconds).format_hms(),
            category,
            color,
            comment
        );
    }
    Ok(())
}

/// Execute the add command
pub fn add(args: AddArgs, ctx: &CliContext) -> Result<()> {
    let session = Session::open(ctx, &args.file, false)?;

    let pos = TimeSpec::parse(&args.pos)
        .map_err(|e| anyhow::anyhow!("Invalid position '{}': {}", args.pos, e))?;
    let comment = args.comment.as_deref().unwrap_or(DEFAULT_COMMENT);

    session.model.add_marker(pos, comment, args.category);
    session.save(&args.file)?;

    if let Some(label) = session.history.lock().unwrap().undo_label() {
        info!("Recorded undoable action: {}", label);
    }
    println!("{} at {} -> {}", comment, pos, args.file);
    Ok(())
}

/// Execute the remove command
pub fn remove(args: RemoveArgs, ctx: &CliContext) -> Result<()> {
    let session = Session::open(ctx, &args.file, true)?;

    let pos = TimeSpec::parse(&args.pos)
        .map_err(|e| anyhow::anyhow!("Invalid position '{}': {}", args.pos, e))?;

    // The model treats removing an absent marker as a caller bug; check first
    if session.model.marker_at(pos).is_none() {
        return Err(anyhow::anyhow!("No marker at {} in {}", pos, args.file));
    }

    session.model.remove_marker(pos);
    session.save(&args.file)?;

    println!("Removed marker at {} from {}", pos, args.file);
    Ok(())
}

/// Execute the snap command
pub fn snap(args: SnapArgs, ctx: &CliContext) -> Result<()> {
    let session = Session::open(ctx, &args.file, true)?;

    let index: Arc<SnapIndex> = Arc::new(SnapIndex::new());
    let target: Arc<dyn SnapTarget> = index.clone();
    session.model.register_snap_target(Arc::downgrade(&target));

    match index.snap_to(args.frame, args.tolerance) {
        Some(snapped) => {
            println!("{}", snapped);
            Ok(())
        }
        None => Err(anyhow::anyhow!(
            "No snap point within {} frames of frame {}",
            args.tolerance,
            args.frame
        )),
    }
}
