//! Reversible-operation framework
//!
//! Mutations are expressed as paired zero-argument operations: a forward
//! (`redo`) and a backward (`undo`) closure that must be exact inverses,
//! side effects included. The history records pairs under a user-visible
//! label; it never executes a forward operation on `push`, since the caller
//! has already applied it once.

use std::collections::VecDeque;

use tracing::warn;

/// A reversible operation step. Returns false when it could not be applied
/// (e.g. the owning model is gone); a false return means no state changed.
pub type Fun = Box<dyn FnMut() -> bool + Send>;

/// The identity operation
pub fn noop() -> Fun {
    Box::new(|| true)
}

/// Chain a local operation pair into an accumulated pair.
///
/// The accumulated redo runs first, then the local redo; the accumulated
/// undo runs last, after the local undo. Repeated calls build a batch whose
/// undo replays every inverse in reverse order.
pub fn update_undo_redo(local_redo: Fun, local_undo: Fun, undo: &mut Fun, redo: &mut Fun) {
    let mut prev_redo = std::mem::replace(redo, noop());
    let mut local_redo = local_redo;
    *redo = Box::new(move || prev_redo() && local_redo());

    let mut prev_undo = std::mem::replace(undo, noop());
    let mut local_undo = local_undo;
    *undo = Box::new(move || local_undo() && prev_undo());
}

/// Default number of history entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

struct HistoryEntry {
    label: String,
    redo: Fun,
    undo: Fun,
}

struct OpenTransaction {
    label: String,
    redo: Fun,
    undo: Fun,
    pushes: usize,
}

/// Command history with labeled entries, a redo cursor and transaction
/// grouping.
///
/// `push` records a pair; `undo`/`redo` replay the stored operations and
/// move the cursor. Pushing after undos truncates the redo tail. Entries
/// beyond the limit are evicted oldest-first.
pub struct CommandHistory {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    limit: usize,
    transaction: Option<OpenTransaction>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    /// Create a history keeping at most `limit` entries
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            limit: limit.max(1),
            transaction: None,
        }
    }

    /// Record an already-executed operation pair.
    ///
    /// Inside an open transaction the pair is merged into the transaction
    /// instead of forming its own entry.
    pub fn push(&mut self, redo: Fun, undo: Fun, label: &str) {
        if let Some(tx) = &mut self.transaction {
            update_undo_redo(redo, undo, &mut tx.undo, &mut tx.redo);
            tx.pushes += 1;
        } else {
            self.record(HistoryEntry {
                label: label.to_string(),
                redo,
                undo,
            });
        }
    }

    /// Open a transaction: subsequent pushes merge into one entry under
    /// `label`.
    ///
    /// # Panics
    /// Panics if a transaction is already open.
    pub fn begin_transaction(&mut self, label: &str) {
        assert!(
            self.transaction.is_none(),
            "CommandHistory: transaction already open"
        );
        self.transaction = Some(OpenTransaction {
            label: label.to_string(),
            redo: noop(),
            undo: noop(),
            pushes: 0,
        });
    }

    /// Close the open transaction and record it as one entry. A transaction
    /// without pushes leaves no entry.
    ///
    /// # Panics
    /// Panics if no transaction is open.
    pub fn commit_transaction(&mut self) {
        let tx = self
            .transaction
            .take()
            .expect("CommandHistory: no open transaction to commit");
        if tx.pushes > 0 {
            self.record(HistoryEntry {
                label: tx.label,
                redo: tx.redo,
                undo: tx.undo,
            });
        }
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(entry);
        self.cursor = self.entries.len();

        if self.entries.len() > self.limit {
            self.entries.pop_front();
            self.cursor -= 1;
        }
    }

    /// Replay the inverse of the entry before the cursor.
    ///
    /// Returns false when there is nothing to undo or the operation reported
    /// failure (its owning model is gone).
    pub fn undo(&mut self) -> bool {
        if self.transaction.is_some() {
            warn!("Undo requested with an open transaction, committing it first");
            self.commit_transaction();
        }
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let entry = &mut self.entries[self.cursor];
        let ok = (entry.undo)();
        if !ok {
            warn!("Undo of '{}' reported failure", entry.label);
        }
        ok
    }

    /// Replay the forward operation of the entry at the cursor
    pub fn redo(&mut self) -> bool {
        if self.cursor >= self.entries.len() {
            return false;
        }
        let entry = &mut self.entries[self.cursor];
        let ok = (entry.redo)();
        if !ok {
            warn!("Redo of '{}' reported failure", entry.label);
        }
        self.cursor += 1;
        ok
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Label of the entry `undo` would replay
    pub fn undo_label(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .map(|i| self.entries[i].label.as_str())
    }

    /// Label of the entry `redo` would replay
    pub fn redo_label(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|e| e.label.as_str())
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.transaction = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    fn counter_pair(value: Arc<AtomicI32>, delta: i32) -> (Fun, Fun) {
        let inc = value.clone();
        let dec = value;
        (
            Box::new(move || {
                inc.fetch_add(delta, Ordering::SeqCst);
                true
            }),
            Box::new(move || {
                dec.fetch_sub(delta, Ordering::SeqCst);
                true
            }),
        )
    }

    #[test]
    fn test_push_undo_redo() {
        let value = Arc::new(AtomicI32::new(0));
        let mut history = CommandHistory::new(10);

        let (mut redo, undo) = counter_pair(value.clone(), 1);
        redo();
        history.push(redo, undo, "Increment");

        assert_eq!(value.load(Ordering::SeqCst), 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_label(), Some("Increment"));

        assert!(history.undo());
        assert_eq!(value.load(Ordering::SeqCst), 0);
        assert!(history.can_redo());

        assert!(history.redo());
        assert_eq!(value.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_undo_redo_exhaustion() {
        let mut history = CommandHistory::new(10);
        assert!(!history.undo());
        assert!(!history.redo());
    }

    #[test]
    fn test_push_truncates_redo_tail() {
        let value = Arc::new(AtomicI32::new(0));
        let mut history = CommandHistory::new(10);

        for _ in 0..3 {
            let (mut redo, undo) = counter_pair(value.clone(), 1);
            redo();
            history.push(redo, undo, "Increment");
        }
        assert!(history.undo());
        assert!(history.undo());
        assert_eq!(history.len(), 3);

        let (mut redo, undo) = counter_pair(value.clone(), 10);
        redo();
        history.push(redo, undo, "Jump");

        // The two undone entries are gone; only the surviving prefix plus
        // the new entry remain.
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(value.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let value = Arc::new(AtomicI32::new(0));
        let mut history = CommandHistory::new(3);

        for _ in 0..5 {
            let (mut redo, undo) = counter_pair(value.clone(), 1);
            redo();
            history.push(redo, undo, "Increment");
        }
        assert_eq!(history.len(), 3);

        // Only three undos are available
        assert!(history.undo());
        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(value.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_transaction_groups_pushes() {
        let value = Arc::new(AtomicI32::new(0));
        let mut history = CommandHistory::new(10);

        history.begin_transaction("Batch");
        for _ in 0..4 {
            let (mut redo, undo) = counter_pair(value.clone(), 1);
            redo();
            history.push(redo, undo, "Increment");
        }
        history.commit_transaction();

        assert_eq!(history.len(), 1);
        assert_eq!(history.undo_label(), Some("Batch"));
        assert_eq!(value.load(Ordering::SeqCst), 4);

        assert!(history.undo());
        assert_eq!(value.load(Ordering::SeqCst), 0);
        assert!(history.redo());
        assert_eq!(value.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_empty_transaction_leaves_no_entry() {
        let mut history = CommandHistory::new(10);
        history.begin_transaction("Nothing");
        history.commit_transaction();
        assert!(history.is_empty());
    }

    #[test]
    #[should_panic(expected = "transaction already open")]
    fn test_nested_transaction_panics() {
        let mut history = CommandHistory::new(10);
        history.begin_transaction("Outer");
        history.begin_transaction("Inner");
    }

    #[test]
    fn test_update_undo_redo_ordering() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut redo = noop();
        let mut undo = noop();

        for step in ["a", "b", "c"] {
            let redo_log = log.clone();
            let undo_log = log.clone();
            update_undo_redo(
                Box::new(move || {
                    redo_log.lock().unwrap().push(format!("redo-{}", step));
                    true
                }),
                Box::new(move || {
                    undo_log.lock().unwrap().push(format!("undo-{}", step));
                    true
                }),
                &mut undo,
                &mut redo,
            );
        }

        assert!(redo());
        assert!(undo());
        let entries = log.lock().unwrap().clone();
        assert_eq!(
            entries,
            vec!["redo-a", "redo-b", "redo-c", "undo-c", "undo-b", "undo-a"]
        );
    }

    #[test]
    fn test_clear() {
        let value = Arc::new(AtomicI32::new(0));
        let mut history = CommandHistory::new(10);
        let (mut redo, undo) = counter_pair(value, 1);
        redo();
        history.push(redo, undo, "Increment");

        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
