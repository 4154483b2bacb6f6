//! TimeMark library
//!
//! The marker/guide timeline-index model of a non-linear video editor:
//! an ordered, undoable annotation store keyed by exact time position, kept
//! consistent with snap-point indices used for timeline magnetism and
//! synchronized with a command-based undo/redo history.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod markers;
pub mod project;
pub mod snap;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use domain::errors::DomainError;
pub use domain::model::{
    category_color, FieldValue, FrameRate, Marker, MarkerField, TimeSpec, CATEGORY_COLORS,
    CATEGORY_COUNT, DEFAULT_COMMENT,
};
pub use error::{TimemarkError, TimemarkResult};
pub use history::{CommandHistory, Fun, DEFAULT_HISTORY_LIMIT};
pub use markers::{MarkerModel, ModelObserver, ModelRole};
pub use project::ProjectProfile;
pub use snap::{SnapIndex, SnapTarget};
