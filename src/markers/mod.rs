//! Marker/guide store
//!
//! An ordered, undoable annotation store keyed by exact time position. Every
//! mutation is expressed as an inverse pair of closures recorded in the
//! shared [`CommandHistory`]; applying a mutation updates registered snap
//! targets and notifies list-view observers from inside the write critical
//! section, and undoing it reproduces the same notifications in reverse.
//!
//! Models are created behind `Arc`; the operation closures capture a weak
//! self-handle and resolve it at execution time, so history entries that
//! outlive their model degrade to no-ops instead of crashing.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock, Weak};

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::domain::model::{
    FieldValue, Marker, MarkerField, TimeSpec, CATEGORY_COLORS, CATEGORY_COUNT,
};
use crate::domain::rules;
use crate::history::{self, CommandHistory, Fun};
use crate::project::ProjectProfile;
use crate::snap::SnapTarget;

thread_local! {
    // Notification dispatch depth for the current thread. The model lock is
    // not reentrant; any model call from inside a callback must fail loudly
    // instead of deadlocking.
    static NOTIFY_DEPTH: Cell<u32> = Cell::new(0);
}

struct DispatchGuard;

impl DispatchGuard {
    fn new() -> Self {
        NOTIFY_DEPTH.with(|d| d.set(d.get() + 1));
        DispatchGuard
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        NOTIFY_DEPTH.with(|d| d.set(d.get() - 1));
    }
}

/// List-view observer contract.
///
/// Callbacks run while the model's write lock is held. A handler must not
/// call back into any model API; doing so panics with a clear message
/// rather than deadlocking.
pub trait ModelObserver: Send + Sync {
    /// Rows `first..=last` were inserted
    fn rows_inserted(&self, _first: usize, _last: usize) {}

    /// Rows `first..=last` were removed
    fn rows_removed(&self, _first: usize, _last: usize) {}

    /// The given fields changed for rows `first..=last`
    fn data_changed(&self, _first: usize, _last: usize, _fields: &[MarkerField]) {}
}

/// What a model annotates: the project timeline (guides) or a single clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRole {
    Guide,
    Clip(String),
}

impl ModelRole {
    fn noun(&self) -> &'static str {
        match self {
            ModelRole::Guide => "guide",
            ModelRole::Clip(_) => "marker",
        }
    }

    fn plural(&self) -> &'static str {
        match self {
            ModelRole::Guide => "guides",
            ModelRole::Clip(_) => "markers",
        }
    }
}

#[derive(Debug, Clone)]
struct MarkerData {
    comment: String,
    category: usize,
}

#[derive(Default)]
struct ModelState {
    markers: BTreeMap<TimeSpec, MarkerData>,
    snaps: Vec<Weak<dyn SnapTarget>>,
    observers: Vec<Arc<dyn ModelObserver>>,
}

impl ModelState {
    /// Row index of `pos` in position order; for an absent key, the row it
    /// would be inserted at
    fn row_of(&self, pos: &TimeSpec) -> usize {
        self.markers.range(..*pos).count()
    }

    fn notify_rows_inserted(&self, first: usize, last: usize) {
        let _guard = DispatchGuard::new();
        for observer in &self.observers {
            observer.rows_inserted(first, last);
        }
    }

    fn notify_rows_removed(&self, first: usize, last: usize) {
        let _guard = DispatchGuard::new();
        for observer in &self.observers {
            observer.rows_removed(first, last);
        }
    }

    fn notify_data_changed(&self, first: usize, last: usize, fields: &[MarkerField]) {
        let _guard = DispatchGuard::new();
        for observer in &self.observers {
            observer.data_changed(first, last, fields);
        }
    }

    /// Tell every live snap target about a new point, dropping expired
    /// handles. The handle set is rebuilt rather than mutated in place so
    /// iteration stays safe against concurrent expiry.
    fn add_snap_point(&mut self, frame: i64) {
        let _guard = DispatchGuard::new();
        let mut live = Vec::with_capacity(self.snaps.len());
        for handle in &self.snaps {
            if let Some(target) = handle.upgrade() {
                target.add_point(frame);
                live.push(handle.clone());
            }
        }
        self.snaps = live;
    }

    fn remove_snap_point(&mut self, frame: i64) {
        let _guard = DispatchGuard::new();
        let mut live = Vec::with_capacity(self.snaps.len());
        for handle in &self.snaps {
            if let Some(target) = handle.upgrade() {
                target.remove_point(frame);
                live.push(handle.clone());
            }
        }
        self.snaps = live;
    }
}

/// Ordered, undoable marker store for one annotated subject.
///
/// Invariant: at most one marker per exact [`TimeSpec`]; iteration order is
/// position order. One store exists per subject: the project-wide guide
/// store, or one per clip, destroyed with it.
pub struct MarkerModel {
    role: ModelRole,
    state: RwLock<ModelState>,
    history: Weak<Mutex<CommandHistory>>,
    profile: Arc<ProjectProfile>,
    default_category: usize,
    // Handle the operation closures capture; set by new_cyclic.
    weak_self: Weak<MarkerModel>,
}

impl MarkerModel {
    /// Create the project-wide guide store
    pub fn new_guide(
        history: Weak<Mutex<CommandHistory>>,
        profile: Arc<ProjectProfile>,
        default_category: usize,
    ) -> Arc<Self> {
        Self::new(ModelRole::Guide, history, profile, default_category)
    }

    /// Create the marker store of one clip
    pub fn new_clip(
        clip_id: impl Into<String>,
        history: Weak<Mutex<CommandHistory>>,
        profile: Arc<ProjectProfile>,
        default_category: usize,
    ) -> Arc<Self> {
        Self::new(
            ModelRole::Clip(clip_id.into()),
            history,
            profile,
            default_category,
        )
    }

    fn new(
        role: ModelRole,
        history: Weak<Mutex<CommandHistory>>,
        profile: Arc<ProjectProfile>,
        default_category: usize,
    ) -> Arc<Self> {
        assert!(
            default_category < CATEGORY_COUNT,
            "default marker category {} outside the category table",
            default_category
        );
        Arc::new_cyclic(|weak| Self {
            role,
            state: RwLock::new(ModelState::default()),
            history,
            profile,
            default_category,
            weak_self: weak.clone(),
        })
    }

    pub fn is_guide(&self) -> bool {
        matches!(self.role, ModelRole::Guide)
    }

    /// Clip id for a clip-marker store, `None` for the guide store
    pub fn clip_id(&self) -> Option<&str> {
        match &self.role {
            ModelRole::Guide => None,
            ModelRole::Clip(id) => Some(id),
        }
    }

    fn assert_not_dispatching(op: &str) {
        NOTIFY_DEPTH.with(|d| {
            if d.get() > 0 {
                panic!(
                    "MarkerModel::{} invoked from inside a change notification",
                    op
                );
            }
        });
    }

    /// Add or rename a marker as one self-contained undoable transaction.
    ///
    /// `None` category means the configured default.
    ///
    /// # Panics
    /// Panics when `category` is outside the category table; external input
    /// must be clamped before reaching this API (see
    /// [`import_from_json`](Self::import_from_json)).
    pub fn add_marker(&self, pos: TimeSpec, comment: &str, category: Option<usize>) {
        Self::assert_not_dispatching("add_marker");
        let rename = self.state.read().unwrap().markers.contains_key(&pos);
        let mut undo = history::noop();
        let mut redo = history::noop();
        if self.add_marker_with(pos, comment, category, &mut undo, &mut redo) {
            let label = if rename {
                format!("Rename {}", self.role.noun())
            } else {
                format!("Add {}", self.role.noun())
            };
            self.push_history(redo, undo, &label);
        }
    }

    /// Composable form of [`add_marker`](Self::add_marker): executes the
    /// forward operation once and chains the inverse pair into
    /// `undo`/`redo` without touching the history. Used to build batch
    /// transactions.
    ///
    /// Returns true iff the forward operation succeeded.
    pub fn add_marker_with(
        &self,
        pos: TimeSpec,
        comment: &str,
        category: Option<usize>,
        undo: &mut Fun,
        redo: &mut Fun,
    ) -> bool {
        Self::assert_not_dispatching("add_marker_with");
        let category = category.unwrap_or(self.default_category);
        assert!(
            category < CATEGORY_COUNT,
            "marker category {} outside the category table",
            category
        );
        let existing = self.state.read().unwrap().markers.get(&pos).cloned();
        let (mut local_redo, local_undo) = match existing {
            // Existing position: a rename, the inverse restores the old text
            Some(old) => (
                self.change_comment_op(pos, comment.to_string(), category),
                self.change_comment_op(pos, old.comment, old.category),
            ),
            None => (
                self.insert_op(pos, comment.to_string(), category),
                self.delete_op(pos),
            ),
        };
        if local_redo() {
            history::update_undo_redo(local_redo, local_undo, undo, redo);
            true
        } else {
            false
        }
    }

    /// Remove the marker at `pos` as one undoable transaction.
    ///
    /// # Panics
    /// Panics when no marker exists at `pos`; callers check
    /// [`has_marker`](Self::has_marker) or [`marker_at`](Self::marker_at)
    /// first.
    pub fn remove_marker(&self, pos: TimeSpec) {
        Self::assert_not_dispatching("remove_marker");
        let old = self
            .state
            .read()
            .unwrap()
            .markers
            .get(&pos)
            .cloned()
            .unwrap_or_else(|| panic!("no marker to remove at {}", pos));
        let undo = self.insert_op(pos, old.comment, old.category);
        let mut redo = self.delete_op(pos);
        if redo() {
            self.push_history(redo, undo, &format!("Delete {}", self.role.noun()));
        }
    }

    /// The marker at `pos`, or `None`; a lookup miss is not an error
    pub fn marker_at(&self, pos: TimeSpec) -> Option<Marker> {
        Self::assert_not_dispatching("marker_at");
        let state = self.state.read().unwrap();
        state.markers.get(&pos).map(|data| Marker {
            position: pos,
            comment: data.comment.clone(),
            category: data.category,
        })
    }

    /// True if a marker sits exactly at `frame` under the current project
    /// frame rate
    pub fn has_marker(&self, frame: i64) -> bool {
        Self::assert_not_dispatching("has_marker");
        let pos = TimeSpec::from_frames(frame, self.profile.frame_rate());
        self.state.read().unwrap().markers.contains_key(&pos)
    }

    /// Current marker count
    pub fn row_count(&self) -> usize {
        Self::assert_not_dispatching("row_count");
        self.state.read().unwrap().markers.len()
    }

    /// Field value for the marker at `row` in position order; `None` for an
    /// out-of-range row. `Frame` is recomputed from the position at the
    /// current rate on every call.
    pub fn data_for_row(&self, row: usize, field: MarkerField) -> Option<FieldValue> {
        Self::assert_not_dispatching("data_for_row");
        let state = self.state.read().unwrap();
        let (pos, data) = state.markers.iter().nth(row)?;
        Some(match field {
            MarkerField::Comment => FieldValue::Text(data.comment.clone()),
            MarkerField::Position => FieldValue::Seconds(pos.as_seconds()),
            MarkerField::Frame => FieldValue::Frame(pos.to_frames(self.profile.frame_rate())),
            MarkerField::Color => FieldValue::Color(CATEGORY_COLORS[data.category]),
            MarkerField::Category => FieldValue::Category(data.category),
        })
    }

    /// Snapshot of all markers in position order
    pub fn markers(&self) -> Vec<Marker> {
        Self::assert_not_dispatching("markers");
        let state = self.state.read().unwrap();
        state
            .markers
            .iter()
            .map(|(pos, data)| Marker {
                position: *pos,
                comment: data.comment.clone(),
                category: data.category,
            })
            .collect()
    }

    /// Import markers from a JSON array of `{pos, comment?, type?}` objects
    /// as one batch transaction.
    ///
    /// Malformed entries are skipped with a diagnostic and out-of-range
    /// categories clamped to 0; if any add fails, the accumulated inverse
    /// chain rolls the whole batch back and the call returns false.
    pub fn import_from_json(&self, data: &str) -> bool {
        Self::assert_not_dispatching("import_from_json");
        let parsed: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(err) => {
                warn!("Marker data is not valid JSON: {}", err);
                return false;
            }
        };
        let Some(list) = parsed.as_array() else {
            warn!("Marker JSON should be an array");
            return false;
        };

        let mut undo = history::noop();
        let mut redo = history::noop();
        for entry in list {
            let Some(raw) = rules::validate_entry(entry) else {
                continue;
            };
            let added =
                self.add_marker_with(raw.position, &raw.comment, Some(raw.category), &mut undo, &mut redo);
            if !added {
                let undone = undo();
                assert!(undone, "failed to roll back a partial marker import");
                return false;
            }
        }

        self.push_history(redo, undo, &format!("Import {}", self.role.plural()));
        true
    }

    /// Serialize all markers in position order; the exact inverse of
    /// [`import_from_json`](Self::import_from_json)
    pub fn export_to_json(&self) -> String {
        Self::assert_not_dispatching("export_to_json");
        let state = self.state.read().unwrap();
        let list: Vec<Value> = state
            .markers
            .iter()
            .map(|(pos, data)| {
                json!({
                    "pos": pos.as_seconds(),
                    "comment": data.comment,
                    "type": data.category,
                })
            })
            .collect();
        Value::Array(list).to_string()
    }

    /// Register a snap target held weakly.
    ///
    /// The target is immediately fed every existing marker position as a
    /// frame index under the current rate, then added to the handle set.
    /// Fed frames are snapshots; after a project rate change the target
    /// must be re-registered.
    ///
    /// # Panics
    /// Panics when the handle is already expired; only live targets may be
    /// registered.
    pub fn register_snap_target(&self, target: Weak<dyn SnapTarget>) {
        Self::assert_not_dispatching("register_snap_target");
        let live = target
            .upgrade()
            .expect("registered snap target must be alive");
        let rate = self.profile.frame_rate();
        let mut state = self.state.write().unwrap();
        {
            let _guard = DispatchGuard::new();
            for pos in state.markers.keys() {
                live.add_point(pos.to_frames(rate));
            }
        }
        state.snaps.push(target);
    }

    /// Register a list-view observer
    pub fn register_view_observer(&self, observer: Arc<dyn ModelObserver>) {
        Self::assert_not_dispatching("register_view_observer");
        self.state.write().unwrap().observers.push(observer);
    }

    fn push_history(&self, redo: Fun, undo: Fun, label: &str) {
        if let Some(history) = self.history.upgrade() {
            history.lock().unwrap().push(redo, undo, label);
        } else {
            debug!("Command history is gone, dropping entry '{}'", label);
        }
    }

    // Operation builders. Each closure captures a weak self-handle, resolves
    // it at execution time and holds the write lock for its full duration,
    // notifications included.

    fn change_comment_op(&self, pos: TimeSpec, comment: String, category: usize) -> Fun {
        let weak = self.weak_self.clone();
        Box::new(move || {
            let Some(model) = weak.upgrade() else {
                return false;
            };
            Self::assert_not_dispatching("change_comment_op");
            let mut state = model.state.write().unwrap();
            assert!(
                state.markers.contains_key(&pos),
                "no marker to rename at {}",
                pos
            );
            let row = state.row_of(&pos);
            let data = state.markers.get_mut(&pos).unwrap();
            data.comment = comment.clone();
            data.category = category;
            state.notify_data_changed(row, row, &[MarkerField::Comment, MarkerField::Color]);
            true
        })
    }

    fn insert_op(&self, pos: TimeSpec, comment: String, category: usize) -> Fun {
        let weak = self.weak_self.clone();
        Box::new(move || {
            let Some(model) = weak.upgrade() else {
                return false;
            };
            Self::assert_not_dispatching("insert_op");
            let frame = pos.to_frames(model.profile.frame_rate());
            let mut state = model.state.write().unwrap();
            assert!(
                !state.markers.contains_key(&pos),
                "marker already present at {}",
                pos
            );
            let row = state.row_of(&pos);
            state.markers.insert(
                pos,
                MarkerData {
                    comment: comment.clone(),
                    category,
                },
            );
            state.notify_rows_inserted(row, row);
            state.add_snap_point(frame);
            true
        })
    }

    fn delete_op(&self, pos: TimeSpec) -> Fun {
        let weak = self.weak_self.clone();
        Box::new(move || {
            let Some(model) = weak.upgrade() else {
                return false;
            };
            Self::assert_not_dispatching("delete_op");
            let frame = pos.to_frames(model.profile.frame_rate());
            let mut state = model.state.write().unwrap();
            assert!(
                state.markers.contains_key(&pos),
                "no marker to delete at {}",
                pos
            );
            let row = state.row_of(&pos);
            state.markers.remove(&pos);
            state.notify_rows_removed(row, row);
            state.remove_snap_point(frame);
            true
        })
    }
}
